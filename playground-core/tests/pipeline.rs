use playground_core::export::{from_json, to_json};
use playground_core::{
    compose_document, ConsoleLevel, Language, LibrarySelection, MemoryStore, Playground,
};

fn scenario() -> Playground {
    let mut app = Playground::new();
    app.edit(Language::Html, "<p>hi</p>", 0);
    app.edit(Language::Css, "p{color:red}", 10);
    app.edit(Language::Js, "console.log('x')", 20);
    app
}

#[test]
fn test_end_to_end_preview() {
    let mut app = scenario();
    assert!(app.poll(520));

    let doc = app.run();
    assert!(doc.contains("<div style=\"display: contents\">\n<p>hi</p>\n</div>"));
    assert!(doc.contains("<style>\np{color:red}\n</style>"));
    assert!(doc.contains("try {\nconsole.log('x')\n}"));
    assert!(!doc.contains("<script src="));

    // What the shim posts once the sandbox runs the script
    let entry = app
        .receive(r#"{"type":"console","method":"log","args":["x"]}"#)
        .expect("console message is accepted");
    assert_eq!(entry.level, ConsoleLevel::Log);
    assert_eq!(entry.message, "x");
    assert_eq!(app.console.entries().len(), 1);
    assert_eq!(app.console.entries()[0].render(), "[LOG] x");
}

#[test]
fn test_composition_depends_only_on_buffers_and_libraries() {
    let mut first = scenario();
    let mut second = scenario();
    second.toggle_console();
    second.toggle_dark_mode();
    second.switch_tab(Language::Js);
    second.receive(r#"{"type":"console","method":"warn","args":["noise"]}"#);

    assert_eq!(first.run(), second.run());
    assert_eq!(
        compose_document(&first.buffers, &first.libraries),
        compose_document(&second.buffers, &LibrarySelection::new())
    );

    second.toggle_library("jquery");
    assert_ne!(first.run(), second.run());
}

#[test]
fn test_relay_filters_noise_and_keeps_order() {
    let mut app = scenario();
    app.run();

    for json in [
        r#"{"type":"console","method":"log","args":["one"]}"#,
        r#"{"type":"console","method":"error","args":["Blocked a frame with origin \"null\""]}"#,
        r#"{"type":"other","payload":1}"#,
        r#"{"type":"console","method":"warn","args":["two"]}"#,
    ] {
        app.receive(json);
    }

    let lines: Vec<String> = app.console.entries().iter().map(|e| e.render()).collect();
    assert_eq!(lines, vec!["[LOG] one", "[WARN] two"]);
    assert!(!app.console.is_visible());
}

#[test]
fn test_export_import_round_trip_through_storage() {
    let mut app = scenario();
    let mut store = MemoryStore::new();
    app.run();
    assert!(app.persist(&mut store));

    let json = to_json(&app.project()).unwrap();
    let mut restored = Playground::load(&MemoryStore::new());
    restored.import_json(&json).unwrap();

    assert_eq!(restored.project(), from_json(&json).unwrap());
    assert_eq!(restored.project(), Playground::load(&store).project());
}
