pub mod config;
pub mod external_catalog;
pub mod metrics;
pub mod report;
pub mod resolver;
pub mod testing;
pub mod view;

pub use config::{
    load_config, load_config_from_str, validate_config, BrowserConfig, Config, ConfigError,
    SanitizedConfig, TmdbConfig,
};
pub use external_catalog::{
    total_pages, CatalogError, ImageFile, ImageUrls, MovieCatalog, MovieImages, MovieSummary,
    PageNumber, ResultPage, TmdbClient, PAGE_SIZE,
};
pub use report::{CollectingReporter, ErrorReporter, TracingReporter};
pub use resolver::{FetchError, ListingRequest, QueryResolver};
pub use view::{
    create_view_system, FetchStatus, ViewController, ViewError, ViewEvent, ViewHandle, ViewState,
};
