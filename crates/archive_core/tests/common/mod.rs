#![allow(dead_code)]

use std::sync::Once;

use archive_core::{update, AppState, CatalogIndex, Effect, Msg};

pub const CATALOG_JSON: &str = r#"{
    "S3": [
        {"code": "CS301", "name": "Algorithms", "downloads": [
            {"title": "2021", "url": "https://x/?id=abc"},
            {"title": "2022", "url": "https://x/?id=def"}
        ]},
        {"code": "MA301", "name": "Linear Algebra", "downloads": [
            {"title": "2020 Supplementary", "url": "https://x/?id=ghi"}
        ]}
    ],
    "S5": [
        {"code": "CS501", "name": "Compilers", "downloads": [
            {"title": "2019", "url": "https://x/?id=jkl"},
            {"title": "2020", "url": "https://x/?id=mno"},
            {"title": "2021", "url": "https://x/?id=pqr"}
        ]}
    ]
}"#;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(archive_logging::initialize_for_tests);
}

pub fn catalog() -> CatalogIndex {
    CatalogIndex::from_json_str(CATALOG_JSON).unwrap()
}

pub fn state() -> AppState {
    init_logging();
    AppState::with_catalog(catalog())
}

pub fn apply(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    let mut state = state;
    for msg in msgs {
        let (next, mut emitted) = update(state, msg);
        effects.append(&mut emitted);
        state = next;
    }
    (state, effects)
}
