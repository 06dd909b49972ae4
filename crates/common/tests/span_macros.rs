use tracing_subscriber::Registry;

#[test]
fn test_span_macros_enter_named_spans() {
    tracing::subscriber::with_default(Registry::default(), || {
        let outer = common::span!("classify");
        assert_eq!(outer.metadata().map(|m| m.name()), Some("classify"));
        assert_eq!(outer.metadata().map(|m| *m.level()), Some(tracing::Level::INFO));

        let inner = common::span_debug!("resize");
        assert_eq!(inner.metadata().map(|m| m.name()), Some("resize"));
        assert_eq!(inner.metadata().map(|m| *m.level()), Some(tracing::Level::DEBUG));
    });
}
