//! Wazuh menu > Management > Decoders

use super::registry::SelectorRegistry;
use crate::driver::Selector;
use crate::error::RegistryError;

/// Selectors of the decoders management screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodersPage {
    pub route: String,
    pub title: Selector,
    pub decoders_button: Selector,
    pub table: Selector,
    pub dropdown_pagination: Selector,
    pub list_pages: Selector,
    pub custom_decoders_button: Selector,
    pub manage_decoders_files_button: Selector,
    pub edit_decoder_button: Selector,
    pub save_decoder_button: Selector,
    pub message_confirm_save: Selector,
    pub button_restart: Selector,
}

impl Default for DecodersPage {
    fn default() -> Self {
        Self {
            route: "/app/wazuh#/manager/?tab=decoders".to_string(),
            title: Selector::css(r#"[class="euiTitle euiTitle--medium"]"#),
            decoders_button: Selector::css(r#"[class="euiSideNavItem euiSideNavItem--trunk"]"#),
            table: Selector::css(
                r#"[class="euiTableRow customRowClass euiTableRow-isClickable"]"#,
            ),
            dropdown_pagination: Selector::css(
                r#"[data-test-subj="tablePaginationPopoverButton"]"#,
            ),
            list_pages: Selector::css(r#"nav[class="euiPagination"]"#),
            custom_decoders_button: Selector::css(r#"[class="euiButtonGroup euiButtonGroup--m"]"#),
            manage_decoders_files_button: Selector::css(
                ":nth-child(3) > .euiButtonEmpty > .euiButtonContent",
            ),
            edit_decoder_button: Selector::css(
                ".euiTableCellContent > div > :nth-child(1) > .euiButtonIcon",
            ),
            save_decoder_button: Selector::css(
                ".euiFlexItem--flexGrowZero > .euiButton > .euiButtonContent",
            ),
            message_confirm_save: Selector::css(".euiText > span"),
            button_restart: Selector::css(
                ".euiText--small > .euiFlexGroup > .euiFlexItem--flexGrowZero > .euiButton > .euiButtonContent",
            ),
        }
    }
}

impl DecodersPage {
    pub fn registry(&self) -> Result<SelectorRegistry, RegistryError> {
        SelectorRegistry::builder()
            .entry("title", self.title.clone())
            .entry("decodersButton", self.decoders_button.clone())
            .entry("table", self.table.clone())
            .entry("dropdownPagination", self.dropdown_pagination.clone())
            .entry("listPages", self.list_pages.clone())
            .entry("customDecodersButton", self.custom_decoders_button.clone())
            .entry("manageDecodersFilesButton", self.manage_decoders_files_button.clone())
            .entry("editDecoderButton", self.edit_decoder_button.clone())
            .entry("saveDecoderButton", self.save_decoder_button.clone())
            .entry("messageConfirmSave", self.message_confirm_save.clone())
            .entry("buttonRestart", self.button_restart.clone())
            .build()
    }
}
