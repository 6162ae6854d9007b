use credview::input::parse;
use credview::view::{ViewOptions, render};

#[test]
fn view_json_matches_golden() {
    let data = parse(include_str!("fixtures/briefing.json")).expect("parse fixture");
    let view = render(&data, &ViewOptions::default());

    let actual = serde_json::to_value(&view).expect("serialize view");
    let expected: serde_json::Value =
        serde_json::from_str(include_str!("golden/briefing_view.json")).expect("parse golden json");

    assert_eq!(actual, expected);
}

#[test]
fn rendering_twice_gives_identical_json() {
    let data = parse(include_str!("fixtures/briefing.json")).expect("parse fixture");
    let a = serde_json::to_string(&render(&data, &ViewOptions::default())).expect("serialize");
    let b = serde_json::to_string(&render(&data, &ViewOptions::default())).expect("serialize");
    assert_eq!(a, b);
}
