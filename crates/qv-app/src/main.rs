//! Main application entry point

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use eframe::egui::{self, CentralPanel, Context};
use parking_lot::Mutex;
use tracing::info;

use qv_core::events::events::{FeedFailed, FeedLoaded};
use qv_core::{handler_from_fn, AppSettings, Dataset, EventBus, SelectionStore};
use qv_data::{DashboardConfig, EarthquakeQuery, HttpFeedSource, QueryState, CONFIG_FILE_NAME};
use qv_ui::{ShellAction, StatusInfo};
use qv_views::{
    handle_export_request, visible_records, ChartConfig, ChartView, DetailView, FilterCache, SpaceViewId,
    TableConfig, TableView, ViewerContext, Viewport,
};

/// Shared status bar notice
type Notice = Arc<Mutex<Option<String>>>;

/// Mirror feed outcomes into the status bar notice
fn subscribe_notices(event_bus: &EventBus, notice: Notice) {
    let loaded_notice = notice.clone();
    event_bus.subscribe::<FeedLoaded>(handler_from_fn(move |event| {
        if let Some(loaded) = event.as_any().downcast_ref::<FeedLoaded>() {
            *loaded_notice.lock() = Some(format!("Loaded {} records", loaded.row_count));
        }
    }));

    event_bus.subscribe::<FeedFailed>(handler_from_fn(move |event| {
        if let Some(failed) = event.as_any().downcast_ref::<FeedFailed>() {
            *notice.lock() = Some(format!("Fetch from {} failed", failed.source_name));
        }
    }));
}

/// Main application state
struct QuakeViewApp {
    /// Tokio runtime the feed is fetched on
    runtime: tokio::runtime::Runtime,

    /// Feed query shared with the background fetch task
    query: Arc<EarthquakeQuery>,

    /// Viewer context shared between all views
    viewer_context: ViewerContext,

    /// The viewport managing the docked views
    viewport: Viewport,

    settings: AppSettings,
    freshness: Duration,

    /// Data version currently installed in the viewer context
    installed_version: u64,

    /// Filter result for the status bar and menu export
    filter_cache: FilterCache,

    /// Last feed or export message, written by event handlers
    notice: Notice,
}

impl QuakeViewApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        config: DashboardConfig,
        source: HttpFeedSource,
    ) -> Self {
        qv_ui::apply_theme(&cc.egui_ctx, &config.settings.theme);

        let event_bus = Arc::new(EventBus::new());
        let notice = Arc::new(Mutex::new(None));

        subscribe_notices(&event_bus, notice.clone());

        let selection = Arc::new(SelectionStore::new());
        let viewer_context = ViewerContext::new(selection);

        let query = Arc::new(
            EarthquakeQuery::from_config(Arc::new(source), &config).with_event_bus(event_bus),
        );

        let settings = config.settings.clone();
        let chart = ChartView::new(
            SpaceViewId::new_v4(),
            "Chart".to_string(),
            ChartConfig::from_settings(&settings),
        );
        let table = TableView::new(
            SpaceViewId::new_v4(),
            "Data Table".to_string(),
            TableConfig::from_settings(&settings),
        );
        let detail = DetailView::new(SpaceViewId::new_v4(), "Details".to_string());
        let viewport = Viewport::dashboard_layout(Box::new(chart), Box::new(table), Box::new(detail));

        Self {
            runtime,
            query,
            viewer_context,
            viewport,
            settings,
            freshness: config.feed.freshness(),
            installed_version: 0,
            filter_cache: FilterCache::new(),
            notice,
        }
    }

    /// Hand newly fetched records to the views
    fn install_dataset(&mut self, state: &QueryState) {
        if state.data_version == self.installed_version {
            return;
        }
        if let Some(records) = &state.data {
            info!("Installing dataset version {} ({} records)", state.data_version, records.len());
            self.viewer_context
                .set_dataset(Dataset::new(records.clone(), state.data_version));
            self.installed_version = state.data_version;
        }
    }

    /// Ask for the feed; a no-op while the cache is fresh or a fetch runs
    fn request_feed(&self, ctx: &Context) {
        let repaint = ctx.clone();
        if self.query.request(self.runtime.handle(), move || repaint.request_repaint()) {
            info!("Requested feed from {}", self.query.source_name());
        }
        // Wake up when the cached feed goes stale
        ctx.request_repaint_after(self.freshness);
    }

    fn refresh(&self, ctx: &Context) {
        self.query.invalidate();
        self.request_feed(ctx);
    }

    fn export(&mut self) {
        let dataset = self.viewer_context.dataset();
        let filter = self.viewer_context.selection.filter_text();
        let indices = self.filter_cache.get(&dataset, &filter);

        if let Some(status) = handle_export_request(visible_records(&dataset, &indices)) {
            *self.notice.lock() = Some(status.message());
        }
    }

    fn status_info(&mut self, state: &QueryState) -> StatusInfo {
        let dataset = self.viewer_context.dataset();
        let selection = self.viewer_context.selection.snapshot();
        let visible_rows = self.filter_cache.get(&dataset, &selection.filter_text).len();

        StatusInfo {
            source_name: self.query.source_name().to_string(),
            total_rows: dataset.len(),
            visible_rows,
            is_loading: state.is_loading,
            error: state.error.clone(),
            selected_id: selection.selected_id,
            notice: self.notice.lock().clone(),
        }
    }
}

impl eframe::App for QuakeViewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let state = self.query.snapshot();
        self.install_dataset(&state);

        let status = self.status_info(&state);
        match qv_ui::menu_bar(ctx, &mut self.settings.theme, &status) {
            Some(ShellAction::Refresh) => self.refresh(ctx),
            Some(ShellAction::Export) => self.export(),
            Some(ShellAction::ThemeChanged) => qv_ui::apply_theme(ctx, &self.settings.theme),
            None => {}
        }
        qv_ui::status_bar(ctx, &status);

        // A failed fetch replaces the dashboard until the user retries
        if let Some(error) = &state.error {
            if qv_ui::error_screen(ctx, error) {
                self.refresh(ctx);
            }
            return;
        }

        self.request_feed(ctx);

        if state.data.is_none() {
            qv_ui::loading_screen(ctx, self.query.source_name());
            return;
        }

        CentralPanel::default().show(ctx, |ui| {
            self.viewport.ui(ui, &self.viewer_context);
        });
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting QuakeView");

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE_NAME))?;
    let source = HttpFeedSource::from_config(&config.feed)?;
    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "QuakeView - Earthquake Dashboard",
        options,
        Box::new(move |cc| Box::new(QuakeViewApp::new(cc, runtime, config, source))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_events_update_notice() {
        let bus = EventBus::new();
        let notice: Notice = Arc::new(Mutex::new(None));
        subscribe_notices(&bus, notice.clone());

        bus.publish(FeedLoaded {
            source_name: "test://feed".to_string(),
            row_count: 3,
        });
        assert_eq!(notice.lock().as_deref(), Some("Loaded 3 records"));

        bus.publish(FeedFailed {
            source_name: "test://feed".to_string(),
            error: "HTTP 503".to_string(),
        });
        assert_eq!(notice.lock().as_deref(), Some("Fetch from test://feed failed"));
    }
}
