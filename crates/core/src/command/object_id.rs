//! Object ids for structural commands.
//!
//! An object id is the command id followed by a microsecond timestamp. The
//! timestamp is bumped past the last one issued by this process, so ids stay
//! unique even when several are generated within the same microsecond.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Name of the object id argument on the wire.
pub const OBJECT_ID_ARG: &str = "ObjectId";

/// Divider between an object id and a disambiguating suffix.
pub const IDENT_DIVIDER: &str = "][";

static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Generate a fresh object id for a command with the given id.
pub fn generate(command_id: &str) -> String {
    let now = Utc::now().timestamp_micros();
    let previous = LAST_ISSUED
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    format!("{command_id}{}", now.max(previous + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_command_prefix() {
        let id = generate("AddCompositionCommand");
        assert!(id.starts_with("AddCompositionCommand"));
        assert!(id["AddCompositionCommand".len()..]
            .chars()
            .all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn ids_are_unique_in_a_burst() {
        let ids: std::collections::HashSet<String> =
            (0..1_000).map(|_| generate("AddSourceCommand")).collect();
        assert_eq!(ids.len(), 1_000);
    }
}
