use serde_json::Value;

/// The wrapper shapes the content repository uses around payloads. Decoding
/// goes through this tagged union with a fixed precedence: a `data` key wins
/// over flat interpretation, `data: null` and bare `null` are `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{data: [...]}` or a bare array.
    Collection(Vec<Value>),
    /// `{data: {...}}` (or a scalar under `data`).
    Single(Value),
    /// A flat object with no `data` wrapper.
    Flat(Value),
    /// `null` or `{data: null}`.
    Empty,
}

impl Envelope {
    pub fn decode(body: Value) -> Envelope {
        match body {
            Value::Null => Envelope::Empty,
            Value::Array(items) => Envelope::Collection(items),
            Value::Object(mut obj) => match obj.remove("data") {
                Some(Value::Array(items)) => Envelope::Collection(items),
                Some(Value::Null) => Envelope::Empty,
                Some(inner) => Envelope::Single(inner),
                None => Envelope::Flat(Value::Object(obj)),
            },
            other => Envelope::Flat(other),
        }
    }

    /// All payload records, entity-flattened.
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Envelope::Collection(items) => items.into_iter().map(flatten_entity).collect(),
            Envelope::Single(value) | Envelope::Flat(value) => vec![flatten_entity(value)],
            Envelope::Empty => Vec::new(),
        }
    }

    /// The single payload record, entity-flattened. A collection yields its
    /// first element; `Empty` yields None.
    pub fn into_single(self) -> Option<Value> {
        match self {
            Envelope::Collection(items) => items.into_iter().next().map(flatten_entity),
            Envelope::Single(value) | Envelope::Flat(value) => Some(flatten_entity(value)),
            Envelope::Empty => None,
        }
    }
}

/// `{id, attributes: {...}}` becomes the attributes object with `id` merged
/// in; the attributes' own keys win over the outer shell on conflict.
/// Anything else passes through unchanged.
pub fn flatten_entity(value: Value) -> Value {
    match value {
        Value::Object(mut obj) => match obj.remove("attributes") {
            Some(Value::Object(mut attributes)) => {
                if let Some(id) = obj.remove("id") {
                    attributes.entry("id".to_string()).or_insert(id);
                }
                Value::Object(attributes)
            }
            Some(other) => {
                obj.insert("attributes".to_string(), other);
                Value::Object(obj)
            }
            None => Value::Object(obj),
        },
        other => other,
    }
}
