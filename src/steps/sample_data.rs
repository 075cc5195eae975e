use log::{debug, info, warn};

use super::common::wait_for_any;
use crate::driver::assert_length;
use crate::error::StepError;
use crate::runner::context::{Observation, ScenarioContext};

pub async fn navigate(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let page = ctx.pages.sample_data.clone();
    ctx.visit(&page.route).await?;
    wait_for_any(ctx, &[&page.add_data_button, &page.remove_data_button]).await?;
    Ok(())
}

/// When The user adds sample data for each category
pub async fn add_all(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let categories = {
        let buttons = ctx.get_object(&ctx.pages.sample_data.add_data_button).await?;
        buttons.click_all().await?
    };
    info!("Added sample data for {} categories", categories);
    ctx.record(Observation::SampleDataAdded { categories });
    Ok(())
}

/// When The user removes sample data for each category
pub async fn remove_all(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let categories = {
        let buttons = ctx
            .get_object(&ctx.pages.sample_data.remove_data_button)
            .await?;
        buttons.click_all().await?
    };
    info!("Removed sample data for {} categories", categories);
    ctx.record(Observation::SampleDataRemoved { categories });
    Ok(())
}

/// Assert exactly `expected` success toasts are on screen
pub async fn assert_toast_count(ctx: &ScenarioContext, expected: usize) -> Result<(), StepError> {
    assert_length(
        ctx.driver.as_ref(),
        &ctx.pages.sample_data.data_added_successfully_toast,
        expected,
        ctx.poll(),
    )
    .await
}

/// Then The add data success toasts are displayed
pub async fn add_toasts_displayed(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let expected = ctx.config.expectations.sample_data_toasts;
    let added = ctx.last_observed(|o| match o {
        Observation::SampleDataAdded { categories } => Some(*categories),
        _ => None,
    });
    compare_with_clicks("addition", added, expected);
    assert_toast_count(ctx, expected).await
}

/// Then The remove data success toasts are displayed
pub async fn remove_toasts_displayed(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let expected = ctx.config.expectations.sample_data_toasts;
    let removed = ctx.last_observed(|o| match o {
        Observation::SampleDataRemoved { categories } => Some(*categories),
        _ => None,
    });
    compare_with_clicks("removal", removed, expected);
    assert_toast_count(ctx, expected).await
}

/// Log how the cards clicked earlier in the scenario compare with the expected toasts
fn compare_with_clicks(action: &str, clicked: Option<usize>, expected: usize) {
    match clicked {
        Some(categories) if categories != expected => debug!(
            "Sample data {} ran on {} categories in this scenario, expecting {} toasts",
            action, categories, expected
        ),
        Some(_) => {}
        None => warn!(
            "No sample data {} observed before checking its toasts",
            action
        ),
    }
}
