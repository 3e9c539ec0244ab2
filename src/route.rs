use ethers::types::Address;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::{display_address, parse_address};

/// Pages the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    MultiSig(Address),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Unknown route '{0}'")]
    Unknown(String),
    #[error("'{0}' is not a valid multisig address")]
    InvalidAddress(String),
}

impl Route {
    pub fn multisig_address(&self) -> Option<Address> {
        match self {
            Route::MultiSig(address) => Some(*address),
            Route::Home => None,
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    /// Accepts `/`, `/multisig/<address>` and a bare address.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let path = trimmed.trim_end_matches('/');

        if path.is_empty() {
            return Ok(Route::Home);
        }

        let candidate = match path.strip_prefix("/multisig/") {
            Some(rest) => rest,
            None if path.starts_with("0x") || path.starts_with("0X") => path,
            None => return Err(RouteError::Unknown(trimmed.to_string())),
        };

        parse_address(candidate)
            .map(Route::MultiSig)
            .map_err(|_| RouteError::InvalidAddress(candidate.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::MultiSig(address) => write!(f, "/multisig/{}", display_address(address)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_home_routes() {
        assert_eq!("/".parse::<Route>(), Ok(Route::Home));
        assert_eq!("".parse::<Route>(), Ok(Route::Home));
        assert_eq!(Route::Home.to_string(), "/");
    }

    #[test]
    fn test_multisig_route() {
        let route: Route = format!("/multisig/{}", ADDRESS).parse().unwrap();
        assert_eq!(route.multisig_address(), Some(ADDRESS.parse().unwrap()));
        assert_eq!(route.to_string(), format!("/multisig/{}", ADDRESS));
    }

    #[test]
    fn test_bare_address_is_multisig_route() {
        let route: Route = ADDRESS.to_lowercase().parse().unwrap();
        assert_eq!(route, Route::MultiSig(ADDRESS.parse().unwrap()));
    }

    #[test]
    fn test_invalid_routes() {
        assert_eq!(
            "/multisig/not-an-address".parse::<Route>(),
            Err(RouteError::InvalidAddress("not-an-address".to_string()))
        );
        assert!(matches!("/settings".parse::<Route>(), Err(RouteError::Unknown(_))));
        assert!(matches!("0x1234".parse::<Route>(), Err(RouteError::InvalidAddress(_))));
    }
}
