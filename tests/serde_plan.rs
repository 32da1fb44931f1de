//! JSON shape of configs and plans handed to a front end.

#![cfg(feature = "serde")]

use zencollage::*;

#[test]
fn config_uses_camel_case() {
    let config = LayoutConfig::grid(3, 2)
        .scale(ScalePolicy::GrowToLargest)
        .fit(GridFit::Crop)
        .max_canvas_dimension(4096.0);
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["mode"], "grid");
    assert_eq!(json["scale"], "growToLargest");
    assert_eq!(json["grid"]["rows"], 3);
    assert_eq!(json["grid"]["fit"], "crop");
    assert_eq!(json["maxCanvasDimension"], 4096.0);
}

#[test]
fn partial_config_fills_defaults() {
    let config: LayoutConfig = serde_json::from_str(r#"{"mode":"row"}"#).unwrap();
    assert_eq!(config, LayoutConfig::row());
}

#[test]
fn plan_survives_json() {
    let images = [
        ImageDescriptor::new(String::from("wide"), 100.0, 50.0),
        ImageDescriptor::new(String::from("square"), 100.0, 100.0),
    ];
    let config = LayoutConfig::grid(1, 2)
        .scale(ScalePolicy::GrowToLargest)
        .background(Background::Transparent);
    let plan = compute_layout(&images, &config).unwrap();

    let json = serde_json::to_string(&plan).unwrap();
    assert!(json.contains("\"imageId\":\"wide\""));
    assert!(json.contains("\"srcCrop\":null"));

    let back: PlacementPlan<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, plan);
}
