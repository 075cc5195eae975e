use anyhow::Result;
use colored::Colorize;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::context::ScenarioContext;
use super::events::{ConsoleEventListener, EventEmitter, TestEvent};
use super::plan::PlannedScenario;
use super::state::{ScenarioState, StepState, TestSessionReport, TestSessionState};
use super::RunOptions;
use crate::driver::BrowserDriver;
use crate::pageobjects::PageObjects;
use crate::report::TestResults;
use crate::steps;
use crate::utils::config::Config;

pub struct TestExecutor {
    driver: Arc<dyn BrowserDriver>,
    pages: Arc<PageObjects>,
    config: Arc<Config>,
    session: TestSessionState,
    emitter: EventEmitter,
    listener: Option<JoinHandle<()>>,
    snapshot_enabled: bool,
    report_enabled: bool,
}

impl TestExecutor {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        pages: Arc<PageObjects>,
        config: Arc<Config>,
        options: &RunOptions,
    ) -> Self {
        let (emitter, receiver) = EventEmitter::new();

        // Start console listener in background
        let listener = tokio::spawn(ConsoleEventListener::listen(receiver));

        Self {
            driver,
            pages,
            config,
            session: TestSessionState::new(&Uuid::new_v4().to_string()),
            emitter,
            listener: Some(listener),
            snapshot_enabled: options.snapshot,
            report_enabled: options.report,
        }
    }

    /// Run scenarios in order
    ///
    /// Without `continueOnFailure` the first failed scenario ends the run and
    /// the rest are not executed.
    pub async fn run(&mut self, scenarios: &[PlannedScenario]) {
        self.session.start();
        self.emitter.emit(TestEvent::SessionStarted {
            session_id: self.session.session_id.clone(),
            scenario_count: scenarios.len(),
        });

        for (i, scenario) in scenarios.iter().enumerate() {
            let passed = self.run_scenario(scenario).await;

            let remaining = scenarios.len() - i - 1;
            if !passed && !self.config.continue_on_failure && remaining > 0 {
                warn!(
                    "Stopping after failed scenario '{}', {} scenario(s) not run",
                    scenario.scenario_name, remaining
                );
                self.emitter.emit(TestEvent::Log {
                    message: format!(
                        "{} {} remaining scenario(s) not run (continueOnFailure is off)",
                        "⚠".yellow(),
                        remaining
                    ),
                });
                break;
            }
        }
    }

    /// Run one scenario with a fresh context, returning whether it passed
    pub async fn run_scenario(&mut self, planned: &PlannedScenario) -> bool {
        let steps = planned
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| StepState::new(i, &step.display, step.line))
            .collect();
        let mut state = ScenarioState::new(
            &planned.feature_name,
            &planned.scenario_name,
            &planned.feature_path,
            steps,
        );

        self.emitter.emit(TestEvent::ScenarioStarted {
            feature_name: planned.feature_name.clone(),
            scenario_name: planned.scenario_name.clone(),
            step_count: planned.steps.len(),
        });
        state.start();

        let mut ctx = ScenarioContext::new(
            self.driver.clone(),
            self.pages.clone(),
            self.config.clone(),
            &planned.feature_path,
            &planned.scenario_name,
        );

        for (index, step) in planned.steps.iter().enumerate() {
            self.emitter.emit(TestEvent::StepStarted {
                index,
                step: step.display.clone(),
            });
            state.steps[index].start();

            match steps::execute(&step.resolved, &mut ctx).await {
                Ok(()) => {
                    state.steps[index].pass();
                    self.emitter.emit(TestEvent::StepPassed {
                        index,
                        duration_ms: state.steps[index].duration_ms.unwrap_or(0),
                    });
                }
                Err(e) => {
                    if e.is_assertion() {
                        warn!("{}:{}: {}", planned.feature_path, step.line, e);
                    } else {
                        error!("{}:{}: {}", planned.feature_path, step.line, e);
                    }

                    if self.snapshot_enabled {
                        state.steps[index].screenshot_path =
                            self.capture_failure(&ctx, index).await;
                    }

                    let message = e.to_string();
                    state.steps[index].fail(message.clone());
                    self.emitter.emit(TestEvent::StepFailed {
                        index,
                        error: message,
                        duration_ms: state.steps[index].duration_ms.unwrap_or(0),
                    });

                    state.skip_after(index, "previous step failed");
                    for skipped in &state.steps[index + 1..] {
                        self.emitter.emit(TestEvent::StepSkipped {
                            index: skipped.index,
                            step: skipped.step_display.clone(),
                            reason: "previous step failed".to_string(),
                        });
                    }
                    break;
                }
            }
        }

        state.finish();
        self.emitter.emit(TestEvent::ScenarioFinished {
            scenario_name: state.scenario_name.clone(),
            status: state.status.clone(),
            duration_ms: state.total_duration_ms,
        });

        let passed = state.passed();
        self.session.add_scenario(state);
        passed
    }

    /// Screenshot of the page at the failing step; capture problems are logged, not raised
    async fn capture_failure(&self, ctx: &ScenarioContext, index: usize) -> Option<String> {
        let path = ctx.failure_screenshot_path(index);
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Failed to create {}: {}", parent.display(), e);
                return None;
            }
        }

        match self.driver.take_screenshot(&path).await {
            Ok(()) => {
                self.emitter.emit(TestEvent::Log {
                    message: format!("{} Saved Screenshot: {}", "📸".green(), path.display()),
                });
                Some(path.to_string_lossy().to_string())
            }
            Err(e) => {
                warn!("Failed to take screenshot: {:#}", e);
                None
            }
        }
    }

    /// Finish the test session and generate reports
    pub async fn finish(mut self) -> Result<TestSessionReport> {
        self.session.finish();

        let report = self.session.to_report();
        self.emitter.emit(TestEvent::SessionFinished {
            summary: report.summary.clone(),
        });

        // Closing the channel ends the listener once it has printed everything
        let Self {
            emitter, listener, ..
        } = self;
        drop(emitter);
        if let Some(handle) = listener {
            handle.await.ok();
        }

        if self.report_enabled {
            let results = TestResults::from_session(report.clone());
            crate::report::write_all(&results, &self.config.output_dir).await?;
            info!("Reports written to {}", self.config.output_dir.display());
        }

        Ok(report)
    }
}
