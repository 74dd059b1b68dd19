use std::{
    fmt::Display,
    io::Write,
    sync::{LazyLock, RwLock},
};

use nu_ansi_term::Color;
use ureq::http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{CliError, CliResult, ErrorContext};

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));
pub static PROGRESS: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub fn progress_enabled() -> bool {
    *PROGRESS.read().unwrap_or_else(|e| e.into_inner())
}

pub fn set_flag(flag: &RwLock<bool>, value: bool) {
    *flag.write().unwrap_or_else(|e| e.into_inner()) = value;
}

pub fn interactive_ask(ques: &str) -> CliResult<String> {
    print!("{ques}");

    std::io::stdout()
        .flush()
        .with_context(|| "flushing stdout stream".to_string())?;

    let mut response = String::new();
    std::io::stdin()
        .read_line(&mut response)
        .with_context(|| "reading input from stdin".to_string())?;

    Ok(response.trim().to_owned())
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color = COLOR.read().unwrap_or_else(|e| e.into_inner());
        if *color {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Parses `Name: value` pairs into a header map. Repeated names are kept.
pub fn parse_headers(headers: &[String]) -> CliResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for header in headers {
        let invalid = || CliError::InvalidHeader(header.clone());
        let (key, value) = header.split_once(':').ok_or_else(invalid)?;
        let name = HeaderName::from_bytes(key.trim().as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
        map.append(name, value);
    }
    Ok(map)
}
