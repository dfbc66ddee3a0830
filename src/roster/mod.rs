pub mod error;
pub mod header;
pub mod parser;
pub mod tokenize;
pub mod types;
pub mod utils;
pub mod validator;

pub use error::{ImportError, ParseError};
pub use header::{ColumnMap, ColumnRole};
pub use parser::{parse_roster, RosterParser};
pub use tokenize::Tokenizer;
pub use types::{ParsedClassData, Student};
pub use validator::validate;

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,brightboost=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
