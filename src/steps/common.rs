use log::{debug, info};

use crate::driver::common::poll_until;
use crate::driver::Selector;
use crate::error::StepError;
use crate::runner::context::ScenarioContext;

/// Wait until any of `selectors` matches, returning the index of the first one that does
pub async fn wait_for_any(ctx: &ScenarioContext, selectors: &[&Selector]) -> Result<usize, StepError> {
    let driver = ctx.driver.as_ref();
    let polled = poll_until(
        move || async move {
            for (i, selector) in selectors.iter().enumerate() {
                if driver.query_count(selector).await? > 0 {
                    return Ok::<_, anyhow::Error>(Some(i));
                }
            }
            Ok(None)
        },
        |found| found.is_some(),
        ctx.poll(),
    )
    .await?;

    polled.into_inner().ok_or_else(|| StepError::ResolutionFailure {
        selector: selectors
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" | "),
        timeout_ms: ctx.poll().timeout_ms,
    })
}

/// Given The wazuh admin user is logged
///
/// Opens the app and signs in through the security plugin form when it shows
/// up; dashboards without authentication go straight to the app header.
pub async fn admin_logged_in(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let login = ctx.pages.login.clone();
    ctx.visit(&login.route).await?;

    let found = wait_for_any(ctx, &[&login.username_input, &login.app_header]).await?;
    if found == 0 {
        let (username, password) = match (&ctx.config.username, &ctx.config.password) {
            (Some(u), Some(p)) => (u.clone(), p.clone()),
            _ => {
                return Err(StepError::Precondition(
                    "login form shown but no credentials configured (set WAZUH_E2E_USERNAME and WAZUH_E2E_PASSWORD)"
                        .to_string(),
                ))
            }
        };

        info!("Signing in as {}", username);
        ctx.driver.fill(&login.username_input, &username).await?;
        ctx.driver.fill(&login.password_input, &password).await?;
        ctx.get_object(&login.submit_button).await?.click(0).await?;
    } else {
        debug!("No login form, app already available");
    }

    ctx.get_object(&login.app_header).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::FakeDriver;
    use crate::pageobjects::PageObjects;
    use crate::utils::config::Config;
    use std::sync::Arc;

    fn config() -> Config {
        Config {
            default_timeout_ms: 100,
            poll_interval_ms: 5,
            max_poll_interval_ms: 10,
            ..Config::default()
        }
    }

    fn context(driver: &FakeDriver, config: Config) -> ScenarioContext {
        ScenarioContext::new(
            Arc::new(driver.clone()),
            Arc::new(PageObjects::new().unwrap()),
            Arc::new(config),
            "features/decoders.feature",
            "login",
        )
    }

    #[tokio::test]
    async fn test_login_form_is_filled() {
        let pages = PageObjects::new().unwrap();
        let login = &pages.login;
        let driver = FakeDriver::new();
        driver.set_count(login.username_input.value(), 1);
        driver.set_count(login.password_input.value(), 1);
        driver.set_count(login.submit_button.value(), 1);
        let header = login.app_header.value().to_string();
        driver.on_click(login.submit_button.value(), move |dom| dom.set_count(&header, 1));

        let mut config = config();
        config.username = Some("admin".to_string());
        config.password = Some("SecretPassword".to_string());
        let mut ctx = context(&driver, config);

        admin_logged_in(&mut ctx).await.unwrap();

        assert_eq!(
            driver.fills(),
            vec![
                (login.username_input.value().to_string(), "admin".to_string()),
                (login.password_input.value().to_string(), "SecretPassword".to_string()),
            ]
        );
        assert_eq!(driver.clicks(), vec![(login.submit_button.value().to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_no_form_means_already_logged_in() {
        let pages = PageObjects::new().unwrap();
        let driver = FakeDriver::new();
        driver.set_count(pages.login.app_header.value(), 1);
        let mut ctx = context(&driver, config());

        admin_logged_in(&mut ctx).await.unwrap();
        assert!(driver.fills().is_empty());
    }

    #[tokio::test]
    async fn test_form_without_credentials_fails() {
        let pages = PageObjects::new().unwrap();
        let driver = FakeDriver::new();
        driver.set_count(pages.login.username_input.value(), 1);
        let mut ctx = context(&driver, config());

        let err = admin_logged_in(&mut ctx).await.unwrap_err();
        assert!(matches!(err, StepError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_wait_for_any_times_out() {
        let driver = FakeDriver::new();
        let ctx = context(&driver, config());
        let a = Selector::css("#a");
        let b = Selector::css("#b");

        match wait_for_any(&ctx, &[&a, &b]).await {
            Err(StepError::ResolutionFailure { selector, .. }) => assert_eq!(selector, "#a | #b"),
            other => panic!("expected resolution failure, got {:?}", other),
        }
    }
}
