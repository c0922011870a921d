pub mod file;
pub mod http;
pub mod util;

use crate::core::config::SourceConfig;
use crate::core::DatasetSource;

/// Builds the dataset source described by `config`.
pub fn from_config(config: &SourceConfig) -> Box<dyn DatasetSource> {
    match config {
        SourceConfig::File(file) => Box::new(file::FileSource::new(&file.path)),
        SourceConfig::Http(http) => Box::new(http::HttpSource::new(
            &http.url,
            std::time::Duration::from_secs(http.revalidate_secs),
        )),
    }
}
