//! CLI definition, settings assembly and the two chart pipelines.

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::browser_adapter::BrowserLauncher;
use crate::adapters::close_chart_svg::render_close_chart;
use crate::adapters::echarts_report::render_indicator_html;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sina_adapter::SinaKlineAdapter;
use crate::adapters::yahoo_adapter::YahooChartAdapter;
use crate::domain::config_validation::{
    parse_config_date, positive_u32, positive_usize, validate_index_plot_config,
    validate_indicator_chart_config, validate_proxy_url, INDEX_PLOT, INDICATOR_CHART,
};
use crate::domain::error::MarketError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_frame::{build_indicator_rows, IndicatorParams};
use crate::domain::ohlcv::sort_by_date;
use crate::domain::settings::{IndexPlotSettings, IndicatorChartSettings};
use crate::logging::init_logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, FetchWindow};
use crate::ports::viewer_port::ViewerPort;

const ARTIFACT_PREFIX: &str = "marketcharts-";

#[derive(Parser, Debug)]
#[command(name = "marketcharts", about = "Fetch daily market data and chart it")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plot recent index closing prices from the Sina K-line feed
    IndexPlot {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the SVG here instead of a kept temporary file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Do not launch a viewer
        #[arg(long)]
        no_open: bool,
    },
    /// Price chart with RSI and MACD panels as an interactive HTML page
    IndicatorChart {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the HTML here instead of a kept temporary file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Proxy for the data request, e.g. http://127.0.0.1:10809
        #[arg(long)]
        proxy: Option<String>,
        /// Do not launch a browser
        #[arg(long)]
        no_open: bool,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::IndexPlot {
            config,
            output,
            no_open,
        } => run_index_plot(config.as_deref(), output.as_deref(), no_open),
        Command::IndicatorChart {
            config,
            output,
            proxy,
            no_open,
        } => run_indicator_chart(
            config.as_deref(),
            output.as_deref(),
            proxy.as_deref(),
            no_open,
        ),
    };

    match result {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// Load the INI file, or an empty config when none was given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, MarketError> {
    match path {
        None => Ok(FileConfigAdapter::empty()),
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path).map_err(|e| MarketError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

fn run_index_plot(
    config_path: Option<&Path>,
    output: Option<&Path>,
    no_open: bool,
) -> Result<PathBuf, MarketError> {
    let config = load_config(config_path)?;
    let settings = build_index_plot_settings(&config)?;
    let data_port = SinaKlineAdapter::from_settings(&settings)?;
    let viewer = BrowserLauncher::from_config(&config);
    let viewer: Option<&dyn ViewerPort> = if no_open { None } else { Some(&viewer) };

    run_index_plot_pipeline(&data_port, viewer, &settings, output)
}

fn run_indicator_chart(
    config_path: Option<&Path>,
    output: Option<&Path>,
    proxy: Option<&str>,
    no_open: bool,
) -> Result<PathBuf, MarketError> {
    let config = load_config(config_path)?;
    let today = Local::now().date_naive();
    let settings = build_indicator_chart_settings(&config, today, proxy)?;
    let data_port = YahooChartAdapter::from_settings(&settings)?;
    let viewer = BrowserLauncher::from_config(&config);
    let viewer: Option<&dyn ViewerPort> = if no_open { None } else { Some(&viewer) };

    run_indicator_chart_pipeline(&data_port, viewer, &settings, output)
}

/// Validate `[index_plot]` and apply it over the built-in defaults.
pub fn build_index_plot_settings(
    config: &dyn ConfigPort,
) -> Result<IndexPlotSettings, MarketError> {
    validate_index_plot_config(config)?;
    let d = IndexPlotSettings::default();

    Ok(IndexPlotSettings {
        endpoint: config.get_non_blank(INDEX_PLOT, "endpoint").unwrap_or(d.endpoint),
        symbol: config.get_non_blank(INDEX_PLOT, "symbol").unwrap_or(d.symbol),
        scale: positive_u32(config, INDEX_PLOT, "scale", d.scale)?,
        moving_average: config.get_bool(INDEX_PLOT, "moving_average", d.moving_average),
        data_length: positive_usize(config, INDEX_PLOT, "datalen", d.data_length)?,
        title: config.get_non_blank(INDEX_PLOT, "title").unwrap_or(d.title),
        width: positive_u32(config, INDEX_PLOT, "width", d.width)?,
        height: positive_u32(config, INDEX_PLOT, "height", d.height)?,
    })
}

/// Validate `[indicator_chart]` and apply it over the built-in defaults.
/// A `--proxy` flag wins over the `proxy` key.
pub fn build_indicator_chart_settings(
    config: &dyn ConfigPort,
    today: NaiveDate,
    proxy_override: Option<&str>,
) -> Result<IndicatorChartSettings, MarketError> {
    validate_indicator_chart_config(config, today)?;
    let d = IndicatorChartSettings::with_defaults(today);

    let proxy = match proxy_override {
        Some(p) => {
            validate_proxy_url(p)?;
            Some(p.trim().to_string())
        }
        None => config.get_non_blank(INDICATOR_CHART, "proxy"),
    };

    let defaults = d.indicators;
    let indicators = IndicatorParams {
        rsi_window: positive_usize(config, INDICATOR_CHART, "rsi_window", defaults.rsi_window)?,
        macd_fast: positive_usize(config, INDICATOR_CHART, "macd_fast", defaults.macd_fast)?,
        macd_slow: positive_usize(config, INDICATOR_CHART, "macd_slow", defaults.macd_slow)?,
        macd_signal: positive_usize(config, INDICATOR_CHART, "macd_signal", defaults.macd_signal)?,
    };

    Ok(IndicatorChartSettings {
        endpoint: config.get_non_blank(INDICATOR_CHART, "endpoint").unwrap_or(d.endpoint),
        symbol: config.get_non_blank(INDICATOR_CHART, "symbol").unwrap_or(d.symbol),
        start_date: parse_config_date(config, INDICATOR_CHART, "start_date")?
            .unwrap_or(d.start_date),
        end_date: parse_config_date(config, INDICATOR_CHART, "end_date")?.unwrap_or(d.end_date),
        proxy,
        adjusted: config.get_bool(INDICATOR_CHART, "adjusted", d.adjusted),
        indicators,
        zoom_start_pct: config.get_double(INDICATOR_CHART, "zoom_start", d.zoom_start_pct),
        title: config.get_non_blank(INDICATOR_CHART, "title").unwrap_or(d.title),
    })
}

/// Fetch the trailing bars, render the close-price SVG, write and open it.
pub fn run_index_plot_pipeline(
    data_port: &dyn DataPort,
    viewer: Option<&dyn ViewerPort>,
    settings: &IndexPlotSettings,
    output: Option<&Path>,
) -> Result<PathBuf, MarketError> {
    // Stage 1: Fetch
    info!(symbol = %settings.symbol, datalen = settings.data_length, "fetching index data");
    let mut bars =
        data_port.fetch_ohlcv(&settings.symbol, &FetchWindow::Latest(settings.data_length))?;
    if bars.is_empty() {
        return Err(MarketError::NoData {
            symbol: settings.symbol.clone(),
        });
    }

    // Stage 2: Order by date
    sort_by_date(&mut bars);
    info!(
        bars = bars.len(),
        first = %bars[0].date,
        last = %bars[bars.len() - 1].date,
        "rendering close-price chart"
    );

    // Stage 3: Render and write
    let svg = render_close_chart(&bars, &settings.title, settings.width, settings.height)?;
    let path = write_artifact(&svg, output, ".svg")?;
    info!(path = %path.display(), "chart written");

    open_artifact(viewer, &path);
    Ok(path)
}

/// Fetch the date range, compute RSI/MACD, render the HTML page, write and
/// open it.
pub fn run_indicator_chart_pipeline(
    data_port: &dyn DataPort,
    viewer: Option<&dyn ViewerPort>,
    settings: &IndicatorChartSettings,
    output: Option<&Path>,
) -> Result<PathBuf, MarketError> {
    // Stage 1: Fetch
    let window = FetchWindow::Range {
        start: settings.start_date,
        end: settings.end_date,
    };
    info!(
        symbol = %settings.symbol,
        start = %settings.start_date,
        end = %settings.end_date,
        proxy = settings.proxy.as_deref().unwrap_or("none"),
        "fetching price history"
    );
    let mut bars = data_port.fetch_ohlcv(&settings.symbol, &window)?;
    if bars.is_empty() {
        return Err(MarketError::NoData {
            symbol: settings.symbol.clone(),
        });
    }
    sort_by_date(&mut bars);

    // Stage 2: Indicators and warm-up trimming
    let params = &settings.indicators;
    let rows = build_indicator_rows(&bars, params);
    if rows.is_empty() {
        return Err(MarketError::InsufficientData {
            symbol: settings.symbol.clone(),
            bars: bars.len(),
            minimum: params.minimum_bars(),
        });
    }
    let rsi = IndicatorType::Rsi(params.rsi_window);
    let macd = IndicatorType::Macd {
        fast: params.macd_fast,
        slow: params.macd_slow,
        signal: params.macd_signal,
    };
    info!(
        bars = bars.len(),
        rows = rows.len(),
        dropped = bars.len() - rows.len(),
        "computed {} and {}",
        rsi,
        macd
    );

    // Stage 3: Render and write
    let html = render_indicator_html(&rows, &settings.title, settings.zoom_start_pct)?;
    let path = write_artifact(&html, output, ".html")?;
    info!(path = %path.display(), "chart written");

    open_artifact(viewer, &path);
    Ok(path)
}

/// Write to `output`, or to a temporary file that outlives the process.
fn write_artifact(
    contents: &str,
    output: Option<&Path>,
    suffix: &str,
) -> Result<PathBuf, MarketError> {
    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        return Ok(path.to_path_buf());
    }

    let mut file = tempfile::Builder::new()
        .prefix(ARTIFACT_PREFIX)
        .suffix(suffix)
        .tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|e| MarketError::Io(e.error))?;
    Ok(path)
}

/// The artifact is already complete, so a launch failure only warns.
fn open_artifact(viewer: Option<&dyn ViewerPort>, path: &Path) {
    if let Some(viewer) = viewer {
        if let Err(e) = viewer.open(path) {
            warn!(error = %e, "could not open viewer, chart kept at {}", path.display());
        }
    }
}
