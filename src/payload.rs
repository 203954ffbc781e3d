//! Request body normalization
//!
//! A body is taken as JSON when it parses; otherwise it is decoded as
//! `application/x-www-form-urlencoded` pairs into a JSON object. Bracketed
//! keys nest: `a[b]=1` gives `{"a":{"b":"1"}}` and `a[]=x` appends under the
//! next free index. A nested level whose keys are exactly `0..n` becomes an
//! array. Repeated keys keep the last value in the first key's position.

use serde_json::{Map, Value};

use crate::store::Record;

/// Turn a raw request body into the record to store
pub fn normalize(body: &[u8]) -> Record {
    serde_json::from_slice(body).unwrap_or_else(|_| decode_form(body))
}

fn decode_form(body: &[u8]) -> Record {
    let mut fields = Map::new();

    for (key, value) in url::form_urlencoded::parse(body) {
        let (base, path) = split_key(&key);
        if base.is_empty() {
            continue;
        }
        insert_path(&mut fields, base, &path, value.into_owned());
    }

    let fields = fields
        .into_iter()
        .map(|(key, value)| (key, into_lists(value)))
        .collect();
    Value::Object(fields)
}

/// Split `a[b][]` into `("a", ["b", ""])`. Text after the last closed
/// bracket is dropped; a key whose first bracket never closes stays literal.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };

    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }

    if segments.is_empty() {
        (key, segments)
    } else {
        (&key[..open], segments)
    }
}

/// Store `value` under `key` followed by `path`; an empty segment means
/// "next index". Scalars in the way are replaced by a fresh level.
fn insert_path(map: &mut Map<String, Value>, key: &str, path: &[&str], value: String) {
    let key = if key.is_empty() {
        next_index(map)
    } else {
        key.to_string()
    };

    match path.split_first() {
        None => {
            map.insert(key, Value::String(value));
        }
        Some((next, rest)) => {
            let slot = map
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                insert_path(child, next, rest, value);
            }
        }
    }
}

/// One past the largest index-like key, or 0
fn next_index(map: &Map<String, Value>) -> String {
    map.keys()
        .filter_map(|key| index_key(key))
        .max()
        .map_or(0, |n| n.saturating_add(1))
        .to_string()
}

/// Canonical decimal keys only: `"7"` yes, `"07"` or `"+7"` no
fn index_key(key: &str) -> Option<u64> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key.len() == 1 || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

fn into_lists(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let is_list = !map.is_empty()
                && map
                    .keys()
                    .enumerate()
                    .all(|(i, key)| index_key(key) == u64::try_from(i).ok());
            let items = map.into_iter().map(|(key, value)| (key, into_lists(value)));
            if is_list {
                Value::Array(items.map(|(_, value)| value).collect())
            } else {
                Value::Object(items.collect())
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_object_kept_verbatim() {
        assert_eq!(
            normalize(br#"{"name":"A","value":1}"#),
            json!({"name": "A", "value": 1})
        );
    }

    #[test]
    fn test_any_json_value_accepted() {
        assert_eq!(normalize(b"[1,2]"), json!([1, 2]));
        assert_eq!(normalize(b"42"), json!(42));
        assert_eq!(normalize(b"null"), Value::Null);
    }

    #[test]
    fn test_form_fallback() {
        assert_eq!(
            normalize(b"name=A&value=1"),
            json!({"name": "A", "value": "1"})
        );
    }

    #[test]
    fn test_form_percent_and_plus_decoding() {
        assert_eq!(
            normalize(b"msg=hello+world&path=%2Ftmp%2Fx"),
            json!({"msg": "hello world", "path": "/tmp/x"})
        );
    }

    #[test]
    fn test_form_array_keys() {
        assert_eq!(
            normalize(b"tags[]=a&tags[]=b&id=7"),
            json!({"tags": ["a", "b"], "id": "7"})
        );
    }

    #[test]
    fn test_form_repeated_key_last_wins() {
        assert_eq!(normalize(b"a=1&a=2"), json!({"a": "2"}));
        assert_eq!(
            serde_json::to_string(&normalize(b"a=1&b=2&a=3")).unwrap(),
            r#"{"a":"3","b":"2"}"#
        );
    }

    #[test]
    fn test_form_nested_keys() {
        assert_eq!(
            normalize(b"a[b]=1&a[c][]=x&a[c][]=y"),
            json!({"a": {"b": "1", "c": ["x", "y"]}})
        );
        assert_eq!(
            normalize(b"user[name]=A&user[age]=3&id=9"),
            json!({"user": {"name": "A", "age": "3"}, "id": "9"})
        );
    }

    #[test]
    fn test_form_indexed_keys() {
        assert_eq!(normalize(b"m[0]=x&m[1]=y"), json!({"m": ["x", "y"]}));
        assert_eq!(normalize(b"m[1]=x"), json!({"m": {"1": "x"}}));
        assert_eq!(
            normalize(b"l[]=a&l[5]=b&l[]=c"),
            json!({"l": {"0": "a", "5": "b", "6": "c"}})
        );
    }

    #[test]
    fn test_form_bracket_edge_cases() {
        // unclosed bracket keeps the key as written
        assert_eq!(normalize(b"a[b=1"), json!({"a[b": "1"}));
        // trailing text after a closed bracket is dropped
        assert_eq!(normalize(b"a[b]c=1"), json!({"a": {"b": "1"}}));
        assert_eq!(normalize(b"[x]=1"), json!({}));
        // a scalar is replaced once the key is used as a container
        assert_eq!(normalize(b"a=1&a[x]=2"), json!({"a": {"x": "2"}}));
    }

    #[test]
    fn test_key_order_kept() {
        let json = normalize(br#"{"zeta":1,"alpha":2,"mid":{"z":0,"a":1}}"#);
        assert_eq!(
            serde_json::to_string(&json).unwrap(),
            r#"{"zeta":1,"alpha":2,"mid":{"z":0,"a":1}}"#
        );
        let form = normalize(b"name=A&heartRate=72&bpm[z]=1&bpm[a]=2");
        assert_eq!(
            serde_json::to_string(&form).unwrap(),
            r#"{"name":"A","heartRate":"72","bpm":{"z":"1","a":"2"}}"#
        );
    }

    #[test]
    fn test_empty_or_garbage_body_is_empty_object() {
        assert_eq!(normalize(b""), json!({}));
        assert_eq!(normalize(b"=orphan"), json!({}));
    }

    #[test]
    fn test_broken_json_becomes_form() {
        // `{"a":` is not JSON, form decoding takes the whole thing as a key
        let record = normalize(br#"{"a":"#);
        assert!(record.is_object());
    }
}
