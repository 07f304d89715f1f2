use crate::Value;

/////////////////////////////////////////////////////////////////////////////////////////

/// Strategy for combining a new value with one already present in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combine {
    /// Latest value wins
    #[default]
    Replace,
    /// First value wins
    Keep,
    /// Arrays are appended, objects merged key by key, anything else replaced
    Merge,
}

impl Combine {
    /// Combine `rhs` into an existing `lhs`.
    pub fn apply(self, lhs: &mut Value, rhs: Value) {
        match self {
            Self::Replace => *lhs = rhs,
            Self::Keep => {
                if lhs.is_null() {
                    *lhs = rhs;
                }
            }
            Self::Merge => merge(lhs, rhs),
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Shallow merge: arrays are appended and objects receive the keys of `rhs`
/// (like `dict.update()`). Mismatching shapes fall back to replacement.
pub fn merge(lhs: &mut Value, rhs: Value) {
    match rhs {
        Value::Array(rhs) => append(lhs, rhs),
        Value::Object(rhs) => update(lhs, rhs),
        _ => *lhs = rhs,
    }
}

fn append(lhs: &mut Value, mut rhs: Vec<Value>) {
    let Some(lhs) = lhs.as_array_mut() else {
        *lhs = rhs.into();
        return;
    };

    lhs.append(&mut rhs);
}

fn update(lhs: &mut Value, rhs: serde_json::Map<String, Value>) {
    let Some(lhs) = lhs.as_object_mut() else {
        *lhs = rhs.into();
        return;
    };

    for (k, v) in rhs {
        lhs.insert(k, v);
    }
}

/////////////////////////////////////////////////////////////////////////////////////////
