//! Analyzer binary overrides from `CC_ANALYZER_BIN`.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Expected shape of the override variable, logged when any entry fails.
pub const OVERRIDE_FORMAT_HINT: &str = "The value of CC_ANALYZER_BIN should \
    be in the format of \
    CC_ANALYZER_BIN='<analyzer1>:/path/to/bin1;<analyzer2>:/path/to/bin2'";

/// Parse the semicolon-separated `<analyzer-name>:<path>` override list.
///
/// Every entry is parsed independently: a malformed entry or one naming a
/// file that does not exist is logged and skipped, and scanning continues.
/// Partial success is not tolerated — if any entry failed, the whole parse
/// fails once all entries have been scanned, carrying one message per bad
/// entry in input order.
pub fn parse_analyzer_overrides(
    raw: &str,
) -> std::result::Result<BTreeMap<String, PathBuf>, Vec<String>> {
    let mut overrides = BTreeMap::new();
    let mut errors = Vec::new();

    for entry in raw.split(';') {
        let (name, path) = match parse_override_entry(entry) {
            Ok(parsed) => parsed,
            Err(message) => {
                log::error!("{message}");
                errors.push(message);
                continue;
            }
        };

        if !path.is_file() {
            let message = format!(
                "'{}' is not a path to an analyzer binary given to CC_ANALYZER_BIN!",
                path.display()
            );
            log::error!("{message}");
            errors.push(message);
            continue;
        }

        log::info!("Using '{}' for analyzer '{}'", path.display(), name);
        overrides.insert(name, path);
    }

    if errors.is_empty() {
        Ok(overrides)
    } else {
        Err(errors)
    }
}

fn parse_override_entry(entry: &str) -> std::result::Result<(String, PathBuf), String> {
    match entry.split_once(':') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!(
            "'{entry}' is not a valid analyzer binary specification"
        )),
    }
}
