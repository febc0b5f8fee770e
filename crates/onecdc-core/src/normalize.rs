//! Waypoint normalization.
//!
//! Shops reach the route view from two producers with different schemas: the
//! backend's ordered route list and the cart's raw selection. Every record goes
//! through [`resolve_waypoint`], which probes an ordered list of key paths per
//! field, and the two lists are merged with the cart taking precedence.

use crate::models::{LatLng, Waypoint};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

type KeyPath = &'static [&'static str];

const ID_PATHS: &[KeyPath] = &[&["shopId"], &["id"], &["_id"], &["shop", "id"], &["shop", "_id"]];
const NAME_PATHS: &[KeyPath] = &[&["name"], &["shopName"], &["shop_name"], &["shop", "name"]];
const ADDRESS_PATHS: &[KeyPath] = &[
    &["address"],
    &["shopAddress"],
    &["shop", "address"],
    &["location", "address"],
];

const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LNG_KEYS: &[&str] = &["lng", "lon", "longitude"];

// Objects carrying lat/lng keys, tried in order. The empty path is the flat record.
const LAT_LNG_OBJECT_PATHS: &[KeyPath] = &[
    &[],
    &["location"],
    &["coordinates"],
    &["position"],
    &["shop"],
    &["shop", "location"],
];

// GeoJSON `[lng, lat]` arrays.
const GEOJSON_PATHS: &[KeyPath] = &[
    &["location", "coordinates"],
    &["geometry", "coordinates"],
    &["shop", "location", "coordinates"],
    &["coordinates"],
];

/// Why a raw record could not become a [`Waypoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no shop id under any known key")]
    MissingId,
    #[error("no shop name under any known key")]
    MissingName,
    #[error("no finite coordinates under any known shape")]
    MissingCoordinates,
}

/// Output of [`normalize_waypoints`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub waypoints: Vec<Waypoint>,
    /// Records rejected from either source.
    pub dropped: usize,
}

fn lookup<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(record, |node, key| node.get(*key))
}

/// Read a shop id from a JSON value: non-empty strings, integers, or Mongo
/// extended JSON (`{"$oid": "..."}`).
pub fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => n
            .as_i64()
            .map(|v| v.to_string())
            .or_else(|| n.as_u64().map(|v| v.to_string())),
        Value::Object(map) => map.get("$oid").and_then(coerce_id),
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn coerce_coordinate(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn first_match<T>(
    record: &Value,
    paths: &[KeyPath],
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    paths
        .iter()
        .find_map(|path| lookup(record, path).and_then(&extract))
}

fn first_key<'a>(node: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| node.get(*key))
}

fn resolve_coordinates(record: &Value) -> Option<(f64, f64)> {
    let from_object = LAT_LNG_OBJECT_PATHS.iter().find_map(|path| {
        let node = lookup(record, path)?;
        let lat = first_key(node, LAT_KEYS).and_then(coerce_coordinate)?;
        let lng = first_key(node, LNG_KEYS).and_then(coerce_coordinate)?;
        Some((lat, lng))
    });
    if from_object.is_some() {
        return from_object;
    }

    GEOJSON_PATHS.iter().find_map(|path| {
        let pair = lookup(record, path)?.as_array()?;
        if pair.len() < 2 {
            return None;
        }
        let lng = coerce_coordinate(&pair[0])?;
        let lat = coerce_coordinate(&pair[1])?;
        Some((lat, lng))
    })
}

/// Read a bare position (`{lat, lng}` and the other supported shapes).
pub fn resolve_position(value: &Value) -> Option<LatLng> {
    resolve_coordinates(value).map(|(lat, lng)| LatLng::new(lat, lng))
}

/// Resolve one raw shop record into a canonical waypoint.
pub fn resolve_waypoint(record: &Value) -> Result<Waypoint, Rejection> {
    let id = first_match(record, ID_PATHS, coerce_id).ok_or(Rejection::MissingId)?;
    let name = first_match(record, NAME_PATHS, coerce_text).ok_or(Rejection::MissingName)?;
    let (lat, lng) = resolve_coordinates(record).ok_or(Rejection::MissingCoordinates)?;
    let address = first_match(record, ADDRESS_PATHS, coerce_text);

    Ok(Waypoint {
        id,
        name,
        address,
        lat,
        lng,
    })
}

/// Insertion-ordered waypoint map keyed by shop id.
#[derive(Default)]
struct WaypointIndex {
    entries: Vec<Waypoint>,
    positions: HashMap<String, usize>,
}

impl WaypointIndex {
    fn upsert(&mut self, incoming: Waypoint) {
        match self.positions.get(&incoming.id) {
            Some(&pos) => {
                let existing = &mut self.entries[pos];
                let address = incoming.address.or_else(|| existing.address.take());
                *existing = Waypoint {
                    address,
                    ..incoming
                };
            }
            None => {
                self.positions.insert(incoming.id.clone(), self.entries.len());
                self.entries.push(incoming);
            }
        }
    }

    fn get(&self, id: &str) -> Option<&Waypoint> {
        self.positions.get(id).map(|&pos| &self.entries[pos])
    }
}

fn absorb(index: &mut WaypointIndex, records: &[Value], source: &str) -> usize {
    let mut dropped = 0;
    for (position, record) in records.iter().enumerate() {
        match resolve_waypoint(record) {
            Ok(waypoint) => index.upsert(waypoint),
            Err(reason) => {
                dropped += 1;
                tracing::warn!(
                    source,
                    position,
                    %reason,
                    "Dropping shop that cannot be placed on the route"
                );
            }
        }
    }
    dropped
}

/// Merge backend and cart shop lists into the ordered waypoints to display.
///
/// Backend entries are applied first and cart entries override them, because
/// the cart is what the shopper actually selected. Ordering follows
/// `selected_ids` when given. Otherwise only shops whose id appears in the
/// cart are kept, in merged insertion order, truncated to `selected_count`
/// when one is given. Empty id lists and a zero count are treated as absent.
pub fn normalize_waypoints(
    backend_order: &[Value],
    cart_selection: &[Value],
    selected_ids: Option<&[String]>,
    selected_count: Option<usize>,
) -> Normalized {
    let mut index = WaypointIndex::default();
    let mut dropped = absorb(&mut index, backend_order, "backend");
    dropped += absorb(&mut index, cart_selection, "cart");

    // A cart record may lack coordinates the backend entry supplies, so
    // membership goes by id alone.
    let cart_ids: HashSet<String> = cart_selection
        .iter()
        .filter_map(|record| first_match(record, ID_PATHS, coerce_id))
        .collect();

    let waypoints = match (selected_ids, selected_count) {
        (Some(ids), _) if !ids.is_empty() => {
            let mut seen = HashSet::new();
            ids.iter()
                .map(|id| id.trim())
                .filter(|id| seen.insert(*id))
                .filter_map(|id| {
                    let waypoint = index.get(id).cloned();
                    if waypoint.is_none() {
                        tracing::debug!(shop_id = id, "Selected shop has no resolved waypoint");
                    }
                    waypoint
                })
                .collect()
        }
        (_, count) => {
            let in_cart = index
                .entries
                .into_iter()
                .filter(|waypoint| cart_ids.contains(&waypoint.id));
            match count {
                Some(count) if count > 0 => in_cart.take(count).collect(),
                _ => in_cart.collect(),
            }
        }
    };

    Normalized { waypoints, dropped }
}
