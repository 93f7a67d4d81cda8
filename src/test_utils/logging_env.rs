use tracing_subscriber::prelude::*;

// `client::tcp` -> `tcp`, `api::status` -> `status`.
fn module_tag(event: &tracing::Event<'_>) -> Option<tracing_forest::Tag> {
    let module = event
        .metadata()
        .module_path()?
        .strip_prefix("pwi4_client::")?
        .rsplit("::")
        .next()?;

    Some(
        tracing_forest::Tag::builder()
            .prefix(module)
            .level(*event.metadata().level())
            .build(),
    )
}

#[ctor::ctor]
fn install_test_logger() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("pwi4_client", tracing::Level::DEBUG),
        )
        .with(tracing_forest::ForestLayer::new(
            tracing_forest::printer::TestCapturePrinter::new(),
            module_tag,
        ))
        .with(tracing_error::ErrorLayer::default())
        .init();

    // Span traces from `tracing-error` show up in failing `eyre::Result` tests.
    if let Err(err) = color_eyre::install() {
        eprintln!("color-eyre was already installed: {err}");
    }
}
