//! Step definitions
//!
//! Every step is a [`StepId`]. [`standard_registry`] binds each id to its
//! phrase once at start-up and [`execute`] dispatches an id to its handler,
//! so adding an id without a handler fails to compile.

pub mod common;
pub mod decoders;
pub mod registry;
pub mod sample_data;

pub use registry::{ResolvedStep, StepDefinition, StepRegistry};

use crate::error::{StepError, StepRegistryError};
use crate::runner::context::ScenarioContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    AdminLoggedIn,
    NavigateToDecoders,
    NavigateToSampleData,
    ClickDecodersNavItem,
    ClickCustomDecoders,
    ClickManageDecodersFiles,
    EditFirstDecoder,
    SaveDecoder,
    OpenPaginationDropdown,
    DecodersTitleDisplayed,
    DecodersTableDisplayed,
    PaginationDisplayed,
    SaveConfirmationDisplayed,
    RestartButtonDisplayed,
    AddSampleData,
    RemoveSampleData,
    AddDataToastsDisplayed,
    RemoveDataToastsDisplayed,
    RemoveDataToastsCount,
}

const DEFINITIONS: &[(&str, StepId)] = &[
    ("The wazuh admin user is logged", StepId::AdminLoggedIn),
    ("The user navigates to the decoders page", StepId::NavigateToDecoders),
    ("The user navigates to the sample data page", StepId::NavigateToSampleData),
    ("The user clicks the decoders side navigation item", StepId::ClickDecodersNavItem),
    ("The user clicks the custom decoders button", StepId::ClickCustomDecoders),
    ("The user clicks the manage decoders files button", StepId::ClickManageDecodersFiles),
    ("The user edits the first decoder", StepId::EditFirstDecoder),
    ("The user saves the decoder", StepId::SaveDecoder),
    ("The user opens the rows per page dropdown", StepId::OpenPaginationDropdown),
    ("The decoders page title is displayed", StepId::DecodersTitleDisplayed),
    ("The decoders table is displayed", StepId::DecodersTableDisplayed),
    ("The decoders pagination is displayed", StepId::PaginationDisplayed),
    ("The save confirmation message is displayed", StepId::SaveConfirmationDisplayed),
    ("The restart button is displayed", StepId::RestartButtonDisplayed),
    ("The user adds sample data for each category", StepId::AddSampleData),
    ("The user removes sample data for each category", StepId::RemoveSampleData),
    ("The add data success toasts are displayed", StepId::AddDataToastsDisplayed),
    ("The remove data success toasts are displayed", StepId::RemoveDataToastsDisplayed),
    ("{int} remove data success toasts are displayed", StepId::RemoveDataToastsCount),
];

/// Registry holding every built-in step
pub fn standard_registry() -> Result<StepRegistry, StepRegistryError> {
    let mut registry = StepRegistry::new();
    for (phrase, id) in DEFINITIONS {
        registry.register(*phrase, *id)?;
    }
    Ok(registry)
}

/// Run the handler bound to a resolved step
pub async fn execute(step: &ResolvedStep, ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let args = StepArgs(&step.args);
    match step.id {
        StepId::AdminLoggedIn => common::admin_logged_in(ctx).await,
        StepId::NavigateToDecoders => decoders::navigate(ctx).await,
        StepId::NavigateToSampleData => sample_data::navigate(ctx).await,
        StepId::ClickDecodersNavItem => decoders::click_nav_item(ctx).await,
        StepId::ClickCustomDecoders => decoders::click_custom_decoders(ctx).await,
        StepId::ClickManageDecodersFiles => decoders::click_manage_files(ctx).await,
        StepId::EditFirstDecoder => decoders::edit_first_decoder(ctx).await,
        StepId::SaveDecoder => decoders::save_decoder(ctx).await,
        StepId::OpenPaginationDropdown => decoders::open_pagination_dropdown(ctx).await,
        StepId::DecodersTitleDisplayed => decoders::title_displayed(ctx).await,
        StepId::DecodersTableDisplayed => decoders::table_displayed(ctx).await,
        StepId::PaginationDisplayed => decoders::pagination_displayed(ctx).await,
        StepId::SaveConfirmationDisplayed => decoders::save_confirmation_displayed(ctx).await,
        StepId::RestartButtonDisplayed => decoders::restart_button_displayed(ctx).await,
        StepId::AddSampleData => sample_data::add_all(ctx).await,
        StepId::RemoveSampleData => sample_data::remove_all(ctx).await,
        StepId::AddDataToastsDisplayed => sample_data::add_toasts_displayed(ctx).await,
        StepId::RemoveDataToastsDisplayed => sample_data::remove_toasts_displayed(ctx).await,
        StepId::RemoveDataToastsCount => {
            let expected = args.count(0)?;
            sample_data::assert_toast_count(ctx, expected).await
        }
    }
}

/// Placeholder captures of a resolved step
struct StepArgs<'a>(&'a [String]);

impl StepArgs<'_> {
    fn count(&self, index: usize) -> Result<usize, StepError> {
        let raw = self
            .0
            .get(index)
            .ok_or_else(|| StepError::Precondition(format!("missing step argument {}", index)))?;
        raw.parse()
            .map_err(|_| StepError::Precondition(format!("`{}` is not a valid count", raw)))
    }
}
