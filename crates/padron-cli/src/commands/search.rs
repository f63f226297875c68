use crate::cli::SearchArgs;
use crate::output::OutputWriter;
use crate::render::Renderer;
use anyhow::Result;
use padron_core::config::LayeredConfig;
use padron_core::View;

pub async fn execute(args: SearchArgs, output: &OutputWriter, config: &LayeredConfig) -> Result<bool> {
    let mut controller = super::build_controller(config)?;
    let presenter = config.presenter();
    let mut renderer = Renderer::new(output);

    controller.set_query(args.municipality.join(" "));

    // A blank name issues no request and leaves the controller idle
    if let Some(pending) = controller.submit() {
        renderer.show(&presenter.select_view(controller.state()))?;
        let completion = pending.run().await;
        controller.apply(completion);
    }

    let view = presenter.select_view(controller.state());
    renderer.show(&view)?;

    Ok(!matches!(view, View::ShowError(_)))
}
