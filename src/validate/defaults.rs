//! Default application
//!
//! Default literals were parsed when the schema loaded, so applying them
//! cannot fail here.

use tracing::debug;

use crate::builder::PendingField;
use crate::observability::Event;
use crate::schema::{OptionsSchema, Presence, Value};

/// Fills every unset non-mandatory field: defaulted fields take their
/// parsed literal, optional fields take their type's zero value.
/// Mandatory fields are left untouched.
pub fn apply_defaults(schema: &OptionsSchema, pending: &mut [PendingField]) {
    for (field, slot) in schema.fields().iter().zip(pending.iter_mut()) {
        if slot.is_set() {
            continue;
        }
        match field.presence() {
            Presence::Default(literal) => {
                if let Some(value) = field.default_value() {
                    debug!(
                        event = %Event::DefaultApplied,
                        field = field.name(),
                        default = %literal,
                        "default applied"
                    );
                    slot.assign(value.clone());
                }
            }
            Presence::Optional => slot.assign(Value::zero(field.kind())),
            Presence::Mandatory => {}
        }
    }
}
