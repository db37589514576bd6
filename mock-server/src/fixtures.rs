//! Fixture layers served by the mock feature API.
//!
//! `c1161` mirrors the city's "municipal offices" layer record for record.
//! `c1120` is a generated layer of 71 parks for count and paging tests.

use std::collections::HashMap;

use serde_json::{json, Value};

pub type Layers = HashMap<String, Vec<Value>>;

pub fn layers() -> Layers {
    let mut layers = HashMap::new();
    layers.insert("c1161".to_string(), municipal_offices());
    layers.insert("c1120".to_string(), parks(71));
    layers
}

fn feature(layer: &str, feature_id: u64, attrs: Value, geometry: String) -> Value {
    json!({
        "files": {},
        "distance": 0,
        "status": 0,
        "created": "2013/07/19 17:01:02",
        "attrs": attrs,
        "feature_id": feature_id,
        "moduserid": 0,
        "layer_id": layer,
        "user_id": 307,
        "mid": 0,
        "geometry": geometry,
    })
}

fn office(feature_id: u64, kind: &str, name: &str, address: &str, lat: &str, lon: &str, phone: &str) -> Value {
    let attrs = json!({
        "attr0": "市役所・出張所",
        "attr1": kind,
        "attr2": name,
        "attr3": address,
        "attr6": lat,
        "attr7": lon,
        "attr8": phone,
    });
    feature("c1161", feature_id, attrs, format!("POINT({lon} {lat})"))
}

fn municipal_offices() -> Vec<Value> {
    vec![
        office(1, "市役所", "流山市役所", "流山市平和台1\u{2010}1\u{2010}1", "35.8562708", "139.9028991", "04-7158-1111"),
        office(2, "出張所", "おおたかの森出張所", "流山市西初石6-185-2（流山おおたかの森S・C内3階）", "35.8706965", "139.9261438", "04-7154-0333 "),
        office(3, "出張所", "東部出張所", "流山市名都借314", "35.843176", "139.942968", "04-7144-2175"),
        office(4, "出張所", "江戸川台駅前出張所", "流山市江戸川台東1\u{2010}4（JA流山市ビル内）", "35.8976138", "139.9107444", "04-7152-3132"),
        office(5, "出張所", "南流山出張所", "流山市南流山3\u{2010}3\u{2010}1（南流山センター内）", "35.8388429", "139.9017914", "04-7159-4512"),
    ]
}

fn parks(count: u64) -> Vec<Value> {
    (1..=count)
        .map(|n| {
            let lat = format!("{:.7}", 35.83 + n as f64 * 0.001);
            let lon = format!("{:.7}", 139.89 + n as f64 * 0.0005);
            let attrs = json!({
                "attr0": "公園",
                "attr2": format!("流山公園{n}"),
                "attr6": lat,
                "attr7": lon,
            });
            feature("c1120", n, attrs, format!("POINT({lon} {lat})"))
        })
        .collect()
}
