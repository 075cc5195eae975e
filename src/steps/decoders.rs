use crate::driver::Selector;
use crate::error::StepError;
use crate::runner::context::ScenarioContext;

async fn click_first(ctx: &ScenarioContext, selector: &Selector) -> Result<(), StepError> {
    ctx.get_object(selector).await?.click(0).await
}

async fn displayed(ctx: &ScenarioContext, selector: &Selector) -> Result<(), StepError> {
    ctx.get_object(selector).await?.should_be_visible().await
}

pub async fn navigate(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let route = ctx.pages.decoders.route.clone();
    ctx.visit(&route).await?;
    ctx.get_object(&ctx.pages.decoders.title).await?;
    Ok(())
}

pub async fn click_nav_item(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    click_first(ctx, &ctx.pages.decoders.decoders_button).await
}

pub async fn click_custom_decoders(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    click_first(ctx, &ctx.pages.decoders.custom_decoders_button).await
}

pub async fn click_manage_files(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    click_first(ctx, &ctx.pages.decoders.manage_decoders_files_button).await
}

pub async fn edit_first_decoder(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    click_first(ctx, &ctx.pages.decoders.edit_decoder_button).await
}

pub async fn save_decoder(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    click_first(ctx, &ctx.pages.decoders.save_decoder_button).await
}

pub async fn open_pagination_dropdown(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    click_first(ctx, &ctx.pages.decoders.dropdown_pagination).await
}

pub async fn title_displayed(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    displayed(ctx, &ctx.pages.decoders.title).await
}

pub async fn table_displayed(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    displayed(ctx, &ctx.pages.decoders.table).await
}

pub async fn pagination_displayed(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    displayed(ctx, &ctx.pages.decoders.list_pages).await
}

pub async fn save_confirmation_displayed(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    displayed(ctx, &ctx.pages.decoders.message_confirm_save).await
}

pub async fn restart_button_displayed(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    displayed(ctx, &ctx.pages.decoders.button_restart).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::FakeDriver;
    use crate::pageobjects::PageObjects;
    use crate::utils::config::Config;
    use std::sync::Arc;

    fn context(driver: &FakeDriver) -> ScenarioContext {
        let config = Config {
            default_timeout_ms: 100,
            poll_interval_ms: 5,
            ..Config::default()
        };
        ScenarioContext::new(
            Arc::new(driver.clone()),
            Arc::new(PageObjects::new().unwrap()),
            Arc::new(config),
            "features/decoders.feature",
            "decoders",
        )
    }

    #[tokio::test]
    async fn test_edit_and_save_flow() {
        let pages = PageObjects::new().unwrap();
        let decoders = &pages.decoders;
        let driver = FakeDriver::new();
        driver.set_count(decoders.title.value(), 1);
        driver.set_count(decoders.table.value(), 10);
        driver.set_count(decoders.edit_decoder_button.value(), 10);
        driver.set_count(decoders.save_decoder_button.value(), 1);
        let restart = decoders.button_restart.value().to_string();
        let message = decoders.message_confirm_save.value().to_string();
        driver.on_click(decoders.save_decoder_button.value(), move |dom| {
            dom.push(&message, "Changes will not take effect until a restart is performed.");
            dom.set_count(&restart, 1);
        });

        let mut ctx = context(&driver);
        navigate(&mut ctx).await.unwrap();
        table_displayed(&mut ctx).await.unwrap();
        edit_first_decoder(&mut ctx).await.unwrap();
        save_decoder(&mut ctx).await.unwrap();
        save_confirmation_displayed(&mut ctx).await.unwrap();
        restart_button_displayed(&mut ctx).await.unwrap();

        assert_eq!(
            driver.clicks(),
            vec![
                (decoders.edit_decoder_button.value().to_string(), 0),
                (decoders.save_decoder_button.value().to_string(), 0),
            ]
        );
        assert!(driver.navigations()[0].ends_with("#/manager/?tab=decoders"));
    }

    #[tokio::test]
    async fn test_missing_restart_button_fails() {
        let driver = FakeDriver::new();
        let mut ctx = context(&driver);

        let err = restart_button_displayed(&mut ctx).await.unwrap_err();
        assert!(matches!(err, StepError::ResolutionFailure { .. }));
    }
}
