//! Hashmap emulation over three-element rows
//!
//! Scripts that want keyed storage build it from arrays: a map is a plain
//! Array whose elements are `[hash, key, value]` rows. These helpers let
//! hosts read and write such maps with the same hashing the scripts use,
//! so the two sides interoperate on one structure.

use crate::hash::hash_bytes;
use crate::value::{Payload, Value};

/// Append a `[hash, key, value]` row to a map.
///
/// Rows are only ever appended; setting a key twice leaves both rows in
/// place, and lookups see the earlier one. Returns false when the map
/// value is not an Array.
pub fn map_set(map: &Value, key: &[u8], value: Value) -> bool {
    let row = Value::array(vec![
        Value::number(hash_bytes(key) as f64),
        Value::string(key),
        value,
    ]);
    match &mut *map.payload_mut() {
        Payload::Array(items) => {
            items.push(row);
            true
        }
        _ => false,
    }
}

/// Find the first row whose hash matches `key`, yielding an alias of the
/// whole row. The value sits at index 2.
pub fn map_get(map: &Value, key: &[u8]) -> Option<Value> {
    let want = hash_bytes(key) as f64;
    match &*map.payload() {
        Payload::Array(items) => items
            .iter()
            .find(|row| row_hash(row) == Some(want))
            .cloned(),
        _ => None,
    }
}

/// Remove every row whose hash matches `key`, returning how many went.
pub fn map_del(map: &Value, key: &[u8]) -> usize {
    let want = hash_bytes(key) as f64;
    match &mut *map.payload_mut() {
        Payload::Array(items) => {
            let before = items.len();
            items.retain(|row| row_hash(row) != Some(want));
            before - items.len()
        }
        _ => 0,
    }
}

fn row_hash(row: &Value) -> Option<f64> {
    match &*row.payload() {
        Payload::Array(cells) => cells.first().and_then(|cell| cell.as_number()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let map = Value::array(Vec::new());
        assert!(map_set(&map, b"name", Value::string("quickbeam")));

        let row = map_get(&map, b"name").expect("row should exist");
        match &*row.payload() {
            Payload::Array(cells) => {
                assert_eq!(cells.len(), 3);
                assert_eq!(cells[1].string_bytes(), Some(b"name".to_vec()));
                assert_eq!(cells[2].string_bytes(), Some(b"quickbeam".to_vec()));
            }
            other => panic!("expected a row, got {other:?}"),
        };
    }

    #[test]
    fn test_get_missing_key() {
        let map = Value::array(Vec::new());
        assert!(map_get(&map, b"absent").is_none());
    }

    #[test]
    fn test_duplicate_sets_stack_and_first_wins() {
        let map = Value::array(Vec::new());
        map_set(&map, b"k", Value::number(1.0));
        map_set(&map, b"k", Value::number(2.0));

        let row = map_get(&map, b"k").unwrap();
        match &*row.payload() {
            Payload::Array(cells) => assert_eq!(cells[2].as_number(), Some(1.0)),
            _ => panic!("expected a row"),
        };
    }

    #[test]
    fn test_del_removes_all_matching_rows() {
        let map = Value::array(Vec::new());
        map_set(&map, b"k", Value::number(1.0));
        map_set(&map, b"k", Value::number(2.0));
        map_set(&map, b"other", Value::number(3.0));

        assert_eq!(map_del(&map, b"k"), 2);
        assert!(map_get(&map, b"k").is_none());
        assert!(map_get(&map, b"other").is_some());
        assert_eq!(map_del(&map, b"k"), 0);
    }

    #[test]
    fn test_non_array_map_is_rejected() {
        let not_map = Value::number(5.0);
        assert!(!map_set(&not_map, b"k", Value::nil()));
        assert!(map_get(&not_map, b"k").is_none());
        assert_eq!(map_del(&not_map, b"k"), 0);
    }

    #[test]
    fn test_rows_visible_to_scripts() {
        // A host-built map is an ordinary array a script can index.
        let map = Value::array(Vec::new());
        map_set(&map, b"k", Value::number(7.0));
        match &*map.payload() {
            Payload::Array(items) => {
                assert_eq!(items.len(), 1);
                assert!(items[0].is_array());
            }
            _ => panic!("expected an array"),
        };
    }
}
