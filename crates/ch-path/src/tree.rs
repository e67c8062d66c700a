//! Read and write a `serde_json::Value` tree by [`DataPath`].

use serde_json::{Map, Value};

use crate::{DataPath, PathError, PathResult, Segment};

/// Value addressed by `path`, or `None` if any step is missing.
///
/// A deep path reads the value at its prefix; `**` reads the whole tree.
pub fn get<'a>(root: &'a Value, path: &DataPath) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match (current, segment) {
            (Value::Object(map), Segment::Field(name)) => map.get(name)?,
            (Value::Array(items), Segment::Index(i)) => items.get(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Like [`get`] but yields `Value::Null` for a missing path.
pub fn get_or_null(root: &Value, path: &DataPath) -> Value {
    get(root, path).cloned().unwrap_or(Value::Null)
}

/// Assign `value` at `path`, returning the previous value if there was one.
///
/// Missing or `null` intermediate steps become empty objects or arrays as the
/// next segment requires.  An array index may address an existing element or
/// append exactly one past the end.  Wildcard paths cannot be assigned.
pub fn set(root: &mut Value, path: &DataPath, value: Value) -> PathResult<Option<Value>> {
    if path.is_deep() {
        return Err(PathError::WildcardAssignment { path: path.to_string() });
    }
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(PathError::Empty);
    };
    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        current = step_mut(current, segment, path, depth)?;
    }
    let slot = step_mut(current, last, path, parents.len())?;
    let previous = std::mem::replace(slot, value);
    Ok(if previous.is_null() { None } else { Some(previous) })
}

fn step_mut<'a>(
    current: &'a mut Value,
    segment: &Segment,
    path:    &DataPath,
    depth:   usize,
) -> PathResult<&'a mut Value> {
    let not_container = || PathError::NotAContainer {
        path: path.to_string(),
        at:   DataPath::from_segments(path.segments()[..depth].to_vec()).to_string(),
    };
    match segment {
        Segment::Field(name) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(map) => Ok(map.entry(name.clone()).or_insert(Value::Null)),
                _ => Err(not_container()),
            }
        }
        Segment::Index(index) => {
            if current.is_null() {
                *current = Value::Array(Vec::new());
            }
            match current {
                Value::Array(items) => {
                    let len = items.len();
                    if *index > len {
                        return Err(PathError::IndexOutOfRange {
                            path: path.to_string(),
                            index: *index,
                            len,
                        });
                    }
                    if *index == len {
                        items.push(Value::Null);
                    }
                    Ok(&mut items[*index])
                }
                _ => Err(not_container()),
            }
        }
    }
}
