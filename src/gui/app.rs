//! Main GUI application module
//!
//! Contains the GuiApp struct, page state, background job polling and the
//! frame loop. Views live in `views/`, reusable pieces in `widgets/`.

use crate::{
    config::{self, Config},
    connection::ChainConnection,
    contract::MultiSigReader,
    generation::RequestGeneration,
    operation_log,
    route::Route,
    submit_form::{self, ActionOutcome, SubmitForm},
    sync::{self, SyncPayload, SyncUpdate},
    transaction_item::{self, TransactionList},
    types::{MultiSigSummary, TransactionFilter, TransactionRecord},
    user_settings::UserSettings,
    utils::{display_address, short_address},
    wallet::WalletBackend,
};
use anyhow::{anyhow, Result};
use eframe::{egui, egui::RichText, App, Frame, NativeOptions};
use ethers::types::{Address, U256};
use futures::future::join_all;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, info, warn};

use super::async_job::{spawn_job, AsyncJob, TaggedJob};
use super::notifications::{push_capped, NotificationEntry};
use super::theme::{configure_style, AppTheme};

const NO_LOGS_YET: &str = "No logs yet. Submit or confirm a transaction to generate entries.";

/// GUI section enum for navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuiSection {
    Home,
    MultiSig,
    Settings,
}

/// What the event subscription of the open multisig is doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SubscriptionStatus {
    Connecting,
    Live { cutoff: u64 },
    NoContractCode,
    Stopped,
}

/// Row fetches dispatched together on one worker, results in `fetches` order
pub(crate) struct RecordBatch {
    fetches: Vec<(U256, RequestGeneration)>,
    job: AsyncJob<Vec<Result<TransactionRecord>>>,
}

/// Everything belonging to one visit of `/multisig/<address>`.
///
/// Replaced wholesale when the address, the filter or the connection changes;
/// dropping it closes the sync channel, which stops the event subscription.
pub(crate) struct MultiSigPageState {
    pub(crate) address: Address,
    pub(crate) generation: RequestGeneration,
    pub(crate) filter: TransactionFilter,
    pub(crate) summary: Option<MultiSigSummary>,
    pub(crate) transactions: TransactionList,
    pub(crate) subscription: SubscriptionStatus,
    pub(crate) sync_rx: Option<UnboundedReceiver<SyncUpdate>>,
    pub(crate) sync_job: Option<AsyncJob<()>>,
    pub(crate) record_jobs: Vec<RecordBatch>,
    pub(crate) confirm_jobs: Vec<(U256, TaggedJob<ActionOutcome<TransactionRecord>>)>,
    pub(crate) submit_form: SubmitForm,
    pub(crate) show_submit_modal: bool,
    pub(crate) submit_job: Option<TaggedJob<ActionOutcome<Vec<U256>>>>,
}

impl MultiSigPageState {
    fn new(address: Address, generation: RequestGeneration, filter: TransactionFilter) -> Self {
        Self {
            address,
            generation,
            filter,
            summary: None,
            transactions: TransactionList::new(),
            subscription: SubscriptionStatus::Connecting,
            sync_rx: None,
            sync_job: None,
            record_jobs: Vec::new(),
            confirm_jobs: Vec::new(),
            submit_form: SubmitForm::new(),
            show_submit_modal: false,
            submit_job: None,
        }
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.submit_job.as_ref().is_some_and(|job| job.is_running())
    }

    /// Threshold used for the "N out of M" labels; zero until the summary arrives
    pub(crate) fn required_confirmations(&self) -> U256 {
        self.summary
            .as_ref()
            .map(|s| s.required_confirmations)
            .unwrap_or_default()
    }

    /// Apply one synchronizer update. Returns the row fetches to dispatch.
    pub(crate) fn apply_sync_update(&mut self, update: SyncUpdate) -> Vec<(U256, RequestGeneration)> {
        if !self.generation.is_current(update.generation) {
            debug!(
                "Dropping sync update from generation {} (page is at {})",
                update.generation.value(),
                self.generation.value()
            );
            return Vec::new();
        }
        match update.payload {
            SyncPayload::Summary(summary) => {
                self.summary = Some(summary);
                Vec::new()
            }
            SyncPayload::TransactionIds(ids) => self.transactions.replace(ids),
            SyncPayload::Subscribed { cutoff } => {
                self.subscription = SubscriptionStatus::Live { cutoff };
                Vec::new()
            }
            SyncPayload::NoContractCode => {
                self.subscription = SubscriptionStatus::NoContractCode;
                Vec::new()
            }
        }
    }

    /// The synchronizer returned; the page is no longer following events
    pub(crate) fn finish_sync(&mut self, result: Result<()>) -> Option<NotificationEntry> {
        self.sync_job = None;
        if self.subscription != SubscriptionStatus::NoContractCode {
            self.subscription = SubscriptionStatus::Stopped;
        }
        result
            .err()
            .map(|e| NotificationEntry::failure("Event subscription", &e))
    }

    /// Apply a batch of row fetches. A failed worker fails every row in it.
    pub(crate) fn finish_records(
        &mut self,
        fetches: Vec<(U256, RequestGeneration)>,
        result: Result<Vec<Result<TransactionRecord>>>,
    ) {
        match result {
            Ok(records) => {
                for ((id, generation), record) in fetches.into_iter().zip(records) {
                    self.transactions.apply_record(id, generation, record);
                }
            }
            Err(e) => {
                warn!("Record fetch worker failed: {:#}", e);
                for (id, generation) in fetches {
                    self.transactions
                        .apply_record(id, generation, Err(anyhow!("{:#}", e)));
                }
            }
        }
    }

    /// A confirm job finished: clear the spinner and apply the refetched record
    pub(crate) fn finish_confirm(
        &mut self,
        id: U256,
        generation: RequestGeneration,
        result: Result<ActionOutcome<TransactionRecord>>,
    ) -> NotificationEntry {
        self.transactions.finish_confirm(id);
        let action = format!("Confirm transaction {}", id);
        match result {
            Ok(outcome) => {
                self.transactions.apply_record(id, generation, outcome.refreshed);
                match outcome.write {
                    Ok(hash) => NotificationEntry::new(format!("Transaction {} confirmed in {:?}", id, hash)),
                    Err(e) => NotificationEntry::failure(&action, &e),
                }
            }
            Err(e) => NotificationEntry::failure(&action, &e),
        }
    }

    /// A submit job finished, whatever its outcome: close the modal, clear the
    /// form and take the refetched id list if it belongs to this page.
    /// Returns the notice and the row fetches to dispatch.
    pub(crate) fn finish_submit(
        &mut self,
        generation: RequestGeneration,
        result: Result<ActionOutcome<Vec<U256>>>,
    ) -> (NotificationEntry, Vec<(U256, RequestGeneration)>) {
        self.submit_job = None;
        self.show_submit_modal = false;
        self.submit_form.reset();

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => return (NotificationEntry::failure("Submit transaction", &e), Vec::new()),
        };
        let notice = match outcome.write {
            Ok(hash) => NotificationEntry::new(format!("Transaction submitted in {:?}", hash)),
            Err(e) => NotificationEntry::failure("Submit transaction", &e),
        };
        let fetches = match outcome.refreshed {
            Ok(ids) if self.generation.is_current(generation) => self.transactions.replace(ids),
            Ok(_) => {
                debug!("Dropping stale transaction ids after submit");
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to refresh transaction ids after submit: {:#}", e);
                Vec::new()
            }
        };
        (notice, fetches)
    }
}

pub(crate) struct LogViewState {
    pub(crate) content: String,
    pub(crate) job: Option<AsyncJob<String>>,
    pub(crate) error: Option<String>,
    pub(crate) scroll_to_bottom: bool,
}

impl Default for LogViewState {
    fn default() -> Self {
        Self {
            content: NO_LOGS_YET.to_string(),
            job: None,
            error: None,
            scroll_to_bottom: false,
        }
    }
}

/// Unsaved edits on the settings page
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SettingsDraft {
    pub(crate) chain_id: u64,
    pub(crate) custom_rpc: String,
    pub(crate) wallet_backend: WalletBackend,
    pub(crate) ledger_account_index: u32,
    pub(crate) poll_interval_ms: u64,
}

impl SettingsDraft {
    pub(crate) fn from_settings(settings: &UserSettings) -> Self {
        Self {
            chain_id: settings.selected_chain_id,
            custom_rpc: settings
                .get_custom_rpc(settings.selected_chain_id)
                .cloned()
                .unwrap_or_default(),
            wallet_backend: settings.wallet_backend,
            ledger_account_index: settings.ledger_account_index,
            poll_interval_ms: settings.event_poll_interval_ms,
        }
    }

    /// Switching networks in the combo box shows that network's saved override
    pub(crate) fn select_chain(&mut self, chain_id: u64, settings: &UserSettings) {
        self.chain_id = chain_id;
        self.custom_rpc = settings.get_custom_rpc(chain_id).cloned().unwrap_or_default();
    }

    pub(crate) fn differs_from(&self, settings: &UserSettings) -> bool {
        *self != Self::from_settings(settings)
    }

    pub(crate) fn apply_to(&self, settings: &mut UserSettings) {
        settings.selected_chain_id = self.chain_id;
        settings.set_custom_rpc(self.chain_id, self.custom_rpc.clone());
        settings.wallet_backend = self.wallet_backend;
        settings.ledger_account_index = self.ledger_account_index;
        settings.event_poll_interval_ms = self.poll_interval_ms;
    }
}

pub struct GuiApp {
    pub(crate) config: Config,
    pub(crate) connection: Option<ChainConnection>,
    pub(crate) connection_error: Option<String>,
    pub(crate) user_settings: UserSettings,
    pub(crate) theme: AppTheme,
    pub(crate) section: GuiSection,
    pub(crate) route: Route,
    // Header
    pub(crate) search_text: String,
    pub(crate) network_name: Option<String>,
    pub(crate) network_job: Option<AsyncJob<String>>,
    // Notifications
    pub(crate) notifications: VecDeque<NotificationEntry>,
    pub(crate) show_notifications_popup: bool,
    pub(crate) notification_toast_visible: bool,
    pub(crate) notification_toast_close_time: Option<Instant>,
    // Pages
    pub(crate) page: Option<MultiSigPageState>,
    page_counter: RequestGeneration,
    pub(crate) home_address_input: String,
    pub(crate) home_address_error: Option<String>,
    pub(crate) log_view: LogViewState,
    pub(crate) settings_draft: SettingsDraft,
}

impl GuiApp {
    fn new(config: Config, user_settings: UserSettings, route: Route, ctx: &egui::Context) -> Self {
        let theme = AppTheme::for_mode(user_settings.dark_mode);
        configure_style(ctx, &theme);

        let settings_draft = SettingsDraft::from_settings(&user_settings);
        let mut app = Self {
            config,
            connection: None,
            connection_error: None,
            user_settings,
            theme,
            section: GuiSection::Home,
            route: Route::Home,
            search_text: String::new(),
            network_name: None,
            network_job: None,
            notifications: VecDeque::new(),
            show_notifications_popup: false,
            notification_toast_visible: false,
            notification_toast_close_time: None,
            page: None,
            page_counter: RequestGeneration::new(),
            home_address_input: String::new(),
            home_address_error: None,
            log_view: LogViewState::default(),
            settings_draft,
        };

        app.connect();
        app.refresh_logs();
        app.navigate(route);
        app
    }

    /// Add to the history and show the toast for a few seconds
    pub(crate) fn notify(&mut self, entry: NotificationEntry) {
        push_capped(&mut self.notifications, entry);
        self.notification_toast_visible = true;
        self.notification_toast_close_time = Some(Instant::now() + Duration::from_secs(5));
    }

    /// (Re)build the chain connection from `self.config`
    pub(crate) fn connect(&mut self) {
        self.network_name = None;
        self.network_job = None;
        match ChainConnection::connect(self.config.clone()) {
            Ok(connection) => {
                self.connection = Some(connection);
                self.connection_error = None;
                self.start_network_check();
            }
            Err(e) => {
                self.connection = None;
                self.connection_error = Some(format!("{:#}", e));
                self.notify(NotificationEntry::failure("Connecting to the RPC endpoint", &e));
            }
        }
    }

    /// Ask the node which chain it is on; feeds the header badge
    pub(crate) fn start_network_check(&mut self) {
        if let Some(connection) = self.connection.clone() {
            self.network_job = Some(spawn_job(move || async move { connection.network_name().await }));
        }
    }

    /// Apply saved settings: new config, new connection, and a fresh page
    pub(crate) fn reconnect(&mut self) {
        self.config = self.user_settings.to_config();
        info!(
            "Reconnecting to {} ({})",
            self.config.rpc_url,
            self.config.network_label()
        );
        self.connect();
        if let Some(page) = &self.page {
            let (address, filter) = (page.address, page.filter);
            self.open_page(address, filter);
        }
    }

    pub(crate) fn set_dark_mode(&mut self, ctx: &egui::Context, dark: bool) {
        self.theme = AppTheme::for_mode(dark);
        configure_style(ctx, &self.theme);
        self.user_settings.dark_mode = dark;
        if let Err(e) = self.user_settings.save() {
            warn!("Failed to save settings: {}", e);
        }
    }

    pub(crate) fn navigate(&mut self, route: Route) {
        match route {
            Route::Home => {
                self.close_page();
                self.section = GuiSection::Home;
                self.route = Route::Home;
            }
            Route::MultiSig(address) => {
                let filter = self
                    .page
                    .as_ref()
                    .filter(|page| page.address == address)
                    .map(|page| page.filter)
                    .unwrap_or_default();
                self.open_page(address, filter);
            }
        }
    }

    /// Parse user input as a route and go there; returns the error text on failure
    pub(crate) fn navigate_to_input(&mut self, input: &str) -> Option<String> {
        match input.parse::<Route>() {
            Ok(route) => {
                self.navigate(route);
                None
            }
            Err(e) => Some(e.to_string()),
        }
    }

    /// Mount the multisig page under a fresh generation and start its synchronizer
    pub(crate) fn open_page(&mut self, address: Address, filter: TransactionFilter) {
        let generation = self.page_counter.bump();
        info!(
            "Opening multisig {} (generation {}, filter {})",
            display_address(&address),
            generation.value(),
            filter.label()
        );
        let mut page = MultiSigPageState::new(address, generation, filter);

        match &self.connection {
            Some(connection) => {
                let (tx, rx) = unbounded_channel();
                let client = connection.reader(address);
                page.sync_rx = Some(rx);
                page.sync_job = Some(spawn_job(move || async move {
                    sync::run(client, filter, generation, tx).await
                }));
            }
            None => page.subscription = SubscriptionStatus::Stopped,
        }

        self.user_settings.record_recent(address, self.config.chain_id);
        if let Err(e) = self.user_settings.save() {
            warn!("Failed to save recent multisigs: {}", e);
        }

        self.page = Some(page);
        self.section = GuiSection::MultiSig;
        self.route = Route::MultiSig(address);
    }

    pub(crate) fn close_page(&mut self) {
        if let Some(page) = self.page.take() {
            debug!("Closing multisig page {}", display_address(&page.address));
        }
    }

    pub(crate) fn set_filter(&mut self, filter: TransactionFilter) {
        if let Some(page) = &self.page {
            if page.filter != filter {
                let address = page.address;
                self.open_page(address, filter);
            }
        }
    }

    pub(crate) fn start_submit(&mut self) {
        let Some(connection) = self.connection.clone() else {
            return;
        };
        let Some(page) = self.page.as_mut() else {
            return;
        };
        if page.submit_job.is_some() {
            return;
        }
        let request = match page.submit_form.to_request() {
            Ok(request) => request,
            Err(e) => {
                let err = anyhow::Error::new(e);
                self.notify(NotificationEntry::failure("Submit transaction", &err));
                return;
            }
        };

        let session = connection.session(page.address);
        let chain_id = connection.config().chain_id;
        let multisig = page.address;
        let filter = page.filter;
        let details = format!(
            "destination={}\nvalue_wei={}\nsigner={}",
            display_address(&request.destination),
            request.value,
            connection.config().wallet_backend.display_name()
        );
        let job = spawn_job(move || async move {
            let outcome = submit_form::submit_and_refresh(&session, request, filter).await;
            operation_log::log_write_outcome("submit", chain_id, &multisig, &details, &outcome.write);
            Ok(outcome)
        });
        page.submit_job = Some(job.tagged(page.generation));
    }

    pub(crate) fn start_confirm(&mut self, id: U256) {
        let Some(connection) = self.connection.clone() else {
            return;
        };
        let Some(page) = self.page.as_mut() else {
            return;
        };
        let Some(generation) = page.transactions.begin_confirm(id) else {
            debug!("Confirm for transaction {} not available", id);
            return;
        };

        let session = connection.session(page.address);
        let chain_id = connection.config().chain_id;
        let multisig = page.address;
        let details = format!(
            "transaction_id={}\nsigner={}",
            id,
            connection.config().wallet_backend.display_name()
        );
        let job = spawn_job(move || async move {
            let outcome = transaction_item::confirm_and_refresh(&session, id).await;
            operation_log::log_write_outcome("confirm", chain_id, &multisig, &details, &outcome.write);
            Ok(outcome)
        });
        page.confirm_jobs.push((id, job.tagged(generation)));
    }

    pub(crate) fn refresh_logs(&mut self) {
        if self.log_view.job.is_none() {
            self.log_view.scroll_to_bottom = true;
            self.log_view.job = Some(spawn_job(|| async move {
                match operation_log::read_log() {
                    Ok(content) if content.is_empty() => Ok(NO_LOGS_YET.to_string()),
                    Ok(content) => Ok(content),
                    Err(e) => Err(anyhow!("Failed to read log file: {}", e)),
                }
            }));
        }
    }

    fn poll_jobs(&mut self) {
        if let Some(res) = self.network_job.as_mut().and_then(|job| job.poll()) {
            self.network_job = None;
            match res {
                Ok(name) => {
                    let expected = self
                        .connection
                        .as_ref()
                        .map(|c| config::normalize_network_name(config::network_name(c.config().chain_id)));
                    if let Some(expected) = expected.filter(|expected| *expected != name) {
                        self.notify(NotificationEntry::new(format!(
                            "Node reports network '{}' but settings select '{}'.",
                            name, expected
                        )));
                    }
                    self.network_name = Some(name);
                }
                Err(e) => {
                    self.network_name = None;
                    self.notify(NotificationEntry::failure("Reading the network", &e));
                }
            }
        }

        if let Some(res) = self.log_view.job.as_mut().and_then(|job| job.poll()) {
            self.log_view.job = None;
            match res {
                Ok(content) => {
                    self.log_view.content = content;
                    self.log_view.error = None;
                }
                Err(e) => self.log_view.error = Some(e.to_string()),
            }
        }

        let wrote_log = self.poll_page();
        if wrote_log {
            self.refresh_logs();
        }
    }

    /// Drain the open page's channels and jobs. Returns true if a write finished.
    fn poll_page(&mut self) -> bool {
        let Some(page) = self.page.as_mut() else {
            return false;
        };
        let mut notices = Vec::new();
        let mut fetches = Vec::new();
        let mut wrote = false;

        if let Some(rx) = page.sync_rx.as_mut() {
            let mut updates = Vec::new();
            while let Ok(update) = rx.try_recv() {
                updates.push(update);
            }
            for update in updates {
                fetches.extend(page.apply_sync_update(update));
            }
        }

        if let Some(res) = page.sync_job.as_mut().and_then(|job| job.poll()) {
            notices.extend(page.finish_sync(res));
        }

        let mut batches = Vec::new();
        page.record_jobs.retain_mut(|batch| match batch.job.poll() {
            Some(res) => {
                batches.push((std::mem::take(&mut batch.fetches), res));
                false
            }
            None => true,
        });
        for (batch, res) in batches {
            page.finish_records(batch, res);
        }

        let mut confirms = Vec::new();
        page.confirm_jobs.retain_mut(|(id, job)| match job.poll() {
            Some((generation, res)) => {
                confirms.push((*id, generation, res));
                false
            }
            None => true,
        });
        for (id, generation, res) in confirms {
            wrote = true;
            notices.push(page.finish_confirm(id, generation, res));
        }

        if let Some((generation, res)) = page.submit_job.as_mut().and_then(|job| job.poll()) {
            wrote = true;
            let (notice, refetch) = page.finish_submit(generation, res);
            notices.push(notice);
            fetches.extend(refetch);
        }

        if let Some(connection) = &self.connection {
            dispatch_record_fetches(page, connection, fetches);
        }
        for notice in notices {
            self.notify(notice);
        }
        wrote
    }
}

/// Fetch the records for `fetches` concurrently on a single worker.
fn dispatch_record_fetches(
    page: &mut MultiSigPageState,
    connection: &ChainConnection,
    fetches: Vec<(U256, RequestGeneration)>,
) {
    if fetches.is_empty() {
        return;
    }
    debug!("Fetching {} transaction records", fetches.len());
    let reader = connection.reader(page.address);
    let ids: Vec<U256> = fetches.iter().map(|(id, _)| *id).collect();
    let job = spawn_job(move || async move {
        Ok(join_all(ids.into_iter().map(|id| reader.transaction_record(id))).await)
    });
    page.record_jobs.push(RecordBatch { fetches, job });
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_jobs();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal_wrapped(|ui| {
                ui.heading(RichText::new("MultiSig Interface").strong().color(self.theme.text_primary));
                ui.label(
                    RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                        .size(12.0)
                        .color(self.theme.text_secondary),
                );
                ui.add_space(self.theme.spacing_lg);

                // Search by address
                let search = ui.add(
                    egui::TextEdit::singleline(&mut self.search_text)
                        .hint_text("Search by Multisig address...")
                        .desired_width(380.0),
                );
                let enter = search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui.add(self.theme.button_small("🔍")).on_hover_text("Open multisig").clicked();
                if (enter || clicked) && !self.search_text.trim().is_empty() {
                    let input = self.search_text.clone();
                    match self.navigate_to_input(&input) {
                        None => self.search_text.clear(),
                        Some(err) => self.notify(NotificationEntry::new(err)),
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let toggle = if self.theme.dark { "🌝" } else { "🌚" };
                    if ui
                        .add(self.theme.button_small(toggle))
                        .on_hover_text("Toggle light/dark mode")
                        .clicked()
                    {
                        let dark = !self.theme.dark;
                        self.set_dark_mode(ctx, dark);
                    }

                    if let Some(name) = self.network_name.clone() {
                        if ui
                            .add(self.theme.button_outline(&name))
                            .on_hover_text(format!(
                                "{} · chain {} · {}",
                                self.config.network_label(),
                                self.config.chain_id,
                                self.config.rpc_url
                            ))
                            .clicked()
                        {
                            self.section = GuiSection::Settings;
                        }
                    } else if self.network_job.is_some() {
                        ui.spinner();
                    } else if self.connection_error.is_some() {
                        ui.label(RichText::new("offline").color(self.theme.error))
                            .on_hover_text(self.connection_error.clone().unwrap_or_default());
                    }
                });
            });
            ui.add_space(6.0);
        });

        if let Some(close_time) = self.notification_toast_close_time {
            if Instant::now() >= close_time {
                self.notification_toast_visible = false;
                self.notification_toast_close_time = None;
            }
        }

        let notification_count = self.notifications.len();
        let has_notifications = notification_count > 0;
        let latest_notification = self.notifications.back().cloned();

        egui::Area::new(egui::Id::new("notification_overlay"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(self.theme.surface)
                    .rounding(6.0)
                    .stroke(egui::Stroke::new(1.0, self.theme.primary))
                    .inner_margin(egui::Margin::symmetric(8.0, 6.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let icon_color = if has_notifications {
                                self.theme.accent_blue
                            } else {
                                self.theme.text_secondary
                            };
                            if ui
                                .add(
                                    egui::Button::new(RichText::new("🔔").size(14.0).color(icon_color))
                                        .fill(egui::Color32::TRANSPARENT)
                                        .stroke(egui::Stroke::NONE),
                                )
                                .on_hover_text("Click to view notification history")
                                .clicked()
                            {
                                self.show_notifications_popup = !self.show_notifications_popup;
                            }

                            if self.notification_toast_visible {
                                if let Some(entry) = &latest_notification {
                                    ui.add_space(4.0);
                                    let color = if entry.is_failure() {
                                        self.theme.error
                                    } else {
                                        self.theme.text_primary
                                    };
                                    ui.label(RichText::new(entry.preview(60)).size(12.0).color(color));
                                }
                            } else if has_notifications {
                                ui.add_space(2.0);
                                ui.label(
                                    RichText::new(format!("{}", notification_count))
                                        .size(10.0)
                                        .color(self.theme.accent_orange),
                                );
                            }
                        });
                    });
            });

        if self.show_notifications_popup {
            egui::Window::new("Notification History")
                .collapsible(false)
                .resizable(true)
                .default_width(450.0)
                .default_height(350.0)
                .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -50.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(format!("{} notifications", self.notifications.len()))
                                .color(self.theme.text_secondary),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.add(self.theme.button_small("Close")).clicked() {
                                self.show_notifications_popup = false;
                            }
                            if ui.add(self.theme.button_small("Clear")).clicked() {
                                self.notifications.clear();
                                self.notification_toast_visible = false;
                            }
                        });
                    });
                    ui.separator();

                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .max_height(280.0)
                        .show(ui, |ui| {
                            if self.notifications.is_empty() {
                                ui.label(RichText::new("No notifications yet.").color(self.theme.text_secondary));
                            }
                            for notification in self.notifications.iter().rev() {
                                ui.horizontal_wrapped(|ui| {
                                    ui.label(
                                        RichText::new(format!("[{}]", notification.time_ago()))
                                            .size(11.0)
                                            .color(self.theme.text_secondary),
                                    );
                                    let color = if notification.is_failure() {
                                        self.theme.error
                                    } else {
                                        self.theme.text_primary
                                    };
                                    ui.label(RichText::new(&notification.message).size(12.0).color(color));
                                });
                                ui.add_space(3.0);
                            }
                        });
                });
        }

        egui::SidePanel::left("nav")
            .resizable(false)
            .default_width(180.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.surface)
                    .inner_margin(egui::Margin::symmetric(4.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.add_space(self.theme.spacing_md);

                let mut nav_items = vec![(GuiSection::Home, "🏠 Home".to_string())];
                if let Some(page) = &self.page {
                    nav_items.push((GuiSection::MultiSig, format!("🔐 {}", short_address(&page.address))));
                }
                nav_items.push((GuiSection::Settings, "⚙ Settings".to_string()));

                for (section, label) in nav_items {
                    let selected = self.section == section;
                    ui.horizontal(|ui| {
                        // Accent bar for the selected entry
                        if selected {
                            ui.add_space(2.0);
                            let (rect, _) = ui.allocate_exact_size(egui::vec2(3.0, 20.0), egui::Sense::hover());
                            ui.painter().rect_filled(rect, 0.0, self.theme.primary);
                            ui.add_space(4.0);
                        } else {
                            ui.add_space(9.0);
                        }

                        let text_color = if selected {
                            self.theme.text_primary
                        } else {
                            self.theme.text_secondary
                        };
                        let response = ui.add(
                            egui::Button::new(RichText::new(&label).size(13.0).color(text_color))
                                .fill(egui::Color32::TRANSPARENT)
                                .stroke(egui::Stroke::NONE),
                        );
                        if response.clicked() {
                            if section == GuiSection::Home && self.section != GuiSection::Home {
                                self.refresh_logs();
                            }
                            if section == GuiSection::Settings {
                                self.settings_draft = SettingsDraft::from_settings(&self.user_settings);
                            }
                            self.section = section;
                        }
                    });
                    ui.add_space(self.theme.spacing_xs);
                }

                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    ui.add_space(self.theme.spacing_sm);
                    ui.label(
                        RichText::new(self.route.to_string())
                            .small()
                            .monospace()
                            .color(self.theme.text_secondary),
                    );
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(self.theme.spacing_md);
            egui::ScrollArea::vertical().show(ui, |ui| match self.section {
                GuiSection::Home => self.view_home(ui),
                GuiSection::MultiSig => self.view_multisig(ui),
                GuiSection::Settings => self.view_settings(ui),
            });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

pub fn launch(config: Config, route: Route) -> Result<()> {
    let mut user_settings = UserSettings::load();

    // Environment overrides win over saved settings for this session
    let config = if Config::env_overrides_present() {
        user_settings.apply_config(&config);
        let mut config = config;
        config.wallet_backend = user_settings.wallet_backend;
        config.ledger_account_index = user_settings.ledger_account_index;
        config
    } else {
        user_settings.to_config()
    };

    let app_creator = move |cc: &eframe::CreationContext<'_>| {
        Box::new(GuiApp::new(config, user_settings, route, &cc.egui_ctx)) as Box<dyn App>
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 760.0])
        .with_min_inner_size([720.0, 480.0]);

    let native_options = NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native("MultiSig Interface", native_options, Box::new(app_creator))
        .map_err(|e| anyhow!("Failed to start GUI: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Bytes, TxHash};

    fn page() -> MultiSigPageState {
        let mut counter = RequestGeneration::new();
        MultiSigPageState::new(Address::from_low_u64_be(0xaa), counter.bump(), TransactionFilter::default())
    }

    fn update(generation: RequestGeneration, payload: SyncPayload) -> SyncUpdate {
        SyncUpdate { generation, payload }
    }

    // ==================== MultiSigPageState tests ====================

    #[test]
    fn test_sync_update_from_previous_page_is_dropped() {
        let mut page = page();
        let stale = RequestGeneration::new();
        let summary = MultiSigSummary {
            balance: U256::from(5),
            required_confirmations: U256::from(2),
            owners: vec![Address::from_low_u64_be(1)],
        };

        let fetches = page.apply_sync_update(update(stale, SyncPayload::Summary(summary)));
        assert!(fetches.is_empty());
        assert!(page.summary.is_none());
        assert_eq!(page.required_confirmations(), U256::zero());
    }

    #[test]
    fn test_sync_updates_fill_page() {
        let mut page = page();
        let generation = page.generation;

        page.apply_sync_update(update(
            generation,
            SyncPayload::Summary(MultiSigSummary {
                balance: U256::exp10(18),
                required_confirmations: U256::from(2),
                owners: vec![Address::from_low_u64_be(1), Address::from_low_u64_be(2)],
            }),
        ));
        assert_eq!(page.required_confirmations(), U256::from(2));

        let fetches = page.apply_sync_update(update(
            generation,
            SyncPayload::TransactionIds(vec![U256::from(0), U256::from(1)]),
        ));
        let ids: Vec<U256> = fetches.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![U256::from(0), U256::from(1)]);
        assert_eq!(page.transactions.len(), 2);

        page.apply_sync_update(update(generation, SyncPayload::Subscribed { cutoff: 12 }));
        assert_eq!(page.subscription, SubscriptionStatus::Live { cutoff: 12 });
    }

    #[test]
    fn test_no_contract_code_status() {
        let mut page = page();
        let generation = page.generation;
        page.apply_sync_update(update(generation, SyncPayload::Summary(MultiSigSummary::without_code(U256::from(7)))));
        page.apply_sync_update(update(generation, SyncPayload::NoContractCode));

        assert_eq!(page.subscription, SubscriptionStatus::NoContractCode);
        let summary = page.summary.as_ref().unwrap();
        assert_eq!(summary.balance, U256::from(7));
        assert!(summary.owners.is_empty());
    }

    #[test]
    fn test_row_fetch_results_flow_into_list() {
        let mut page = page();
        let generation = page.generation;
        let fetches = page.apply_sync_update(update(generation, SyncPayload::TransactionIds(vec![U256::from(3)])));
        let (id, row_generation) = fetches[0];

        let record = TransactionRecord {
            id,
            destination: Address::from_low_u64_be(0xd0),
            value: U256::exp10(17),
            executed: false,
            data: Bytes::default(),
            confirmed_by: vec![Address::from_low_u64_be(1)],
        };
        assert!(page.transactions.apply_record(id, row_generation, Ok(record)));
        assert!(page.transactions.get(id).unwrap().can_confirm());
    }

    // ==================== job completion tests ====================

    fn record(id: u64, executed: bool) -> TransactionRecord {
        TransactionRecord {
            id: U256::from(id),
            destination: Address::from_low_u64_be(0xd0),
            value: U256::exp10(17),
            executed,
            data: Bytes::default(),
            confirmed_by: vec![Address::from_low_u64_be(1)],
        }
    }

    fn page_with_open_modal() -> MultiSigPageState {
        let mut page = page();
        page.show_submit_modal = true;
        page.submit_form.destination = "0x00000000000000000000000000000000000000d0".to_string();
        page.submit_form.value = "1".to_string();
        page.submit_form.touch_value();
        page
    }

    fn assert_modal_closed(page: &MultiSigPageState) {
        assert!(!page.show_submit_modal);
        assert!(page.submit_job.is_none());
        assert!(page.submit_form.destination.is_empty());
        assert!(!page.submit_form.any_touched());
    }

    #[test]
    fn test_successful_submit_closes_modal_and_refetches() {
        let mut page = page_with_open_modal();
        let generation = page.generation;
        let outcome = ActionOutcome {
            write: Ok(TxHash::repeat_byte(0x11)),
            refreshed: Ok(vec![U256::zero()]),
        };

        let (notice, fetches) = page.finish_submit(generation, Ok(outcome));

        assert_modal_closed(&page);
        assert!(!notice.is_failure());
        assert_eq!(fetches.len(), 1);
        assert_eq!(page.transactions.len(), 1);
    }

    #[test]
    fn test_failed_submit_still_closes_modal_and_refetches() {
        let mut page = page_with_open_modal();
        let generation = page.generation;
        let outcome = ActionOutcome {
            write: Err(anyhow!("User rejected the request")),
            refreshed: Ok(vec![U256::zero(), U256::one()]),
        };

        let (notice, fetches) = page.finish_submit(generation, Ok(outcome));

        assert_modal_closed(&page);
        assert!(notice.is_failure());
        assert_eq!(fetches.len(), 2);
    }

    #[test]
    fn test_failed_submit_worker_closes_modal() {
        let mut page = page_with_open_modal();
        let generation = page.generation;

        let (notice, fetches) = page.finish_submit(generation, Err(anyhow!("Worker task disconnected")));

        assert_modal_closed(&page);
        assert!(notice.is_failure());
        assert!(fetches.is_empty());
    }

    #[test]
    fn test_submit_ids_from_old_generation_are_dropped() {
        let mut page = page_with_open_modal();
        let stale = RequestGeneration::new();
        let outcome = ActionOutcome {
            write: Ok(TxHash::repeat_byte(0x11)),
            refreshed: Ok(vec![U256::zero()]),
        };

        let (_, fetches) = page.finish_submit(stale, Ok(outcome));

        assert_modal_closed(&page);
        assert!(fetches.is_empty());
        assert!(page.transactions.is_empty());
    }

    #[test]
    fn test_confirm_outcome_applies_to_row() {
        let mut page = page();
        let generation = page.generation;
        let fetches = page.apply_sync_update(update(generation, SyncPayload::TransactionIds(vec![U256::from(4)])));
        page.finish_records(fetches, Ok(vec![Ok(record(4, false))]));

        let row_generation = page.transactions.begin_confirm(U256::from(4)).unwrap();
        let outcome = ActionOutcome {
            write: Ok(TxHash::repeat_byte(0x22)),
            refreshed: Ok(record(4, true)),
        };
        let notice = page.finish_confirm(U256::from(4), row_generation, Ok(outcome));

        assert!(!notice.is_failure());
        let item = page.transactions.get(U256::from(4)).unwrap();
        assert!(!item.is_confirming());
        assert!(item.is_executed());
    }

    #[test]
    fn test_failed_confirm_clears_spinner_and_reports() {
        let mut page = page();
        let generation = page.generation;
        let fetches = page.apply_sync_update(update(generation, SyncPayload::TransactionIds(vec![U256::from(4)])));
        page.finish_records(fetches, Ok(vec![Ok(record(4, false))]));

        let row_generation = page.transactions.begin_confirm(U256::from(4)).unwrap();
        let notice = page.finish_confirm(U256::from(4), row_generation, Err(anyhow!("execution reverted")));

        assert!(notice.is_failure());
        let item = page.transactions.get(U256::from(4)).unwrap();
        assert!(!item.is_confirming());
        assert!(item.can_confirm());
    }

    #[test]
    fn test_failed_record_worker_stops_row_loading() {
        let mut page = page();
        let generation = page.generation;
        let fetches = page.apply_sync_update(update(
            generation,
            SyncPayload::TransactionIds(vec![U256::zero(), U256::one()]),
        ));

        page.finish_records(fetches, Err(anyhow!("Worker task disconnected")));

        assert!(page.transactions.items().iter().all(|item| !item.is_loading()));
        assert!(page.transactions.items().iter().all(|item| item.record().is_none()));
    }

    #[test]
    fn test_finished_sync_stops_subscription() {
        let mut page = page();
        assert!(page.finish_sync(Ok(())).is_none());
        assert_eq!(page.subscription, SubscriptionStatus::Stopped);

        let mut no_code = self::page();
        no_code.subscription = SubscriptionStatus::NoContractCode;
        assert!(no_code.finish_sync(Err(anyhow!("filter not found"))).unwrap().is_failure());
        assert_eq!(no_code.subscription, SubscriptionStatus::NoContractCode);
    }

    // ==================== SettingsDraft tests ====================

    #[test]
    fn test_settings_draft_round_trip() {
        let mut settings = UserSettings::default();
        let mut draft = SettingsDraft::from_settings(&settings);
        assert!(!draft.differs_from(&settings));

        draft.select_chain(11155111, &settings);
        draft.custom_rpc = "https://my-sepolia.example".to_string();
        draft.wallet_backend = WalletBackend::Ledger;
        draft.ledger_account_index = 3;
        draft.poll_interval_ms = 1_500;
        assert!(draft.differs_from(&settings));

        draft.apply_to(&mut settings);
        assert!(!draft.differs_from(&settings));
        assert_eq!(settings.get_custom_rpc(11155111).unwrap(), "https://my-sepolia.example");
        assert_eq!(settings.to_config().ledger_account_index, 3);
    }

    #[test]
    fn test_select_chain_loads_saved_override() {
        let mut settings = UserSettings::default();
        settings.set_custom_rpc(1, "https://eth.example".to_string());
        let mut draft = SettingsDraft::from_settings(&settings);

        draft.select_chain(1, &settings);
        assert_eq!(draft.custom_rpc, "https://eth.example");
        draft.select_chain(10, &settings);
        assert!(draft.custom_rpc.is_empty());
    }
}
