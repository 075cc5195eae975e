use anyhow::Result;
use gherkin::GherkinEnv;
use std::path::{Path, PathBuf};

use super::types::{Feature, Scenario, Step, StepArgument};

/// Column name to value for one examples row
type ExampleRow = [(String, String)];

/// Parse a `.feature` file
pub fn parse_feature_file(path: &Path) -> Result<Feature> {
    let parsed = gherkin::Feature::parse_path(path, GherkinEnv::default())
        .map_err(|e| anyhow::anyhow!("Failed to parse feature file {}: {}", path.display(), e))?;
    Ok(from_gherkin(parsed, path.to_path_buf()))
}

/// Parse feature text; `source` names it in errors and becomes the feature path
pub fn parse_feature_content(content: &str, source: &str) -> Result<Feature> {
    let parsed = gherkin::Feature::parse(content, GherkinEnv::default())
        .map_err(|e| anyhow::anyhow!("{}: {}", source, e))?;
    Ok(from_gherkin(parsed, PathBuf::from(source)))
}

fn from_gherkin(parsed: gherkin::Feature, path: PathBuf) -> Feature {
    let tags = merge_tags(&[], &parsed.tags);
    let background = background_steps(parsed.background.as_ref());

    let mut scenarios = Vec::new();
    for scenario in &parsed.scenarios {
        expand(scenario, &tags, &background, &mut scenarios);
    }
    for rule in &parsed.rules {
        let rule_tags = merge_tags(&tags, &rule.tags);
        let mut rule_background = background.clone();
        rule_background.extend(background_steps(rule.background.as_ref()));
        for scenario in &rule.scenarios {
            expand(scenario, &rule_tags, &rule_background, &mut scenarios);
        }
    }

    Feature {
        name: parsed.name.trim().to_string(),
        scenarios,
        path,
    }
}

/// `inherited` followed by `own`, without the leading '@' or repeats
fn merge_tags(inherited: &[String], own: &[String]) -> Vec<String> {
    let mut tags = inherited.to_vec();
    for tag in own {
        let tag = tag.trim().trim_start_matches('@');
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn background_steps(background: Option<&gherkin::Background>) -> Vec<Step> {
    background
        .map(|b| b.steps.iter().map(|s| convert_step(s, &[])).collect())
        .unwrap_or_default()
}

/// Push the scenario, or one scenario per examples row of an outline
fn expand(
    scenario: &gherkin::Scenario,
    inherited_tags: &[String],
    background: &[Step],
    out: &mut Vec<Scenario>,
) {
    let tags = merge_tags(inherited_tags, &scenario.tags);
    let build = |name: String, tags: Vec<String>, row: &ExampleRow| Scenario {
        name,
        tags,
        background: background.to_vec(),
        steps: scenario.steps.iter().map(|s| convert_step(s, row)).collect(),
    };

    if scenario.examples.is_empty() {
        out.push(build(scenario.name.trim().to_string(), tags, &[]));
        return;
    }

    let mut row_number = 0;
    for examples in &scenario.examples {
        let Some(table) = &examples.table else {
            continue;
        };
        let Some((header, rows)) = table.rows.split_first() else {
            continue;
        };
        let example_tags = merge_tags(&tags, &examples.tags);

        for cells in rows {
            row_number += 1;
            let row: Vec<(String, String)> =
                header.iter().cloned().zip(cells.iter().cloned()).collect();
            let name = format!("{} #{}", substitute(scenario.name.trim(), &row), row_number);
            out.push(build(name, example_tags.clone(), &row));
        }
    }
}

fn convert_step(step: &gherkin::Step, row: &ExampleRow) -> Step {
    let argument = match (&step.docstring, &step.table) {
        (Some(doc), _) => Some(StepArgument::DocString(substitute(doc, row))),
        (None, Some(table)) => Some(StepArgument::DataTable(
            table
                .rows
                .iter()
                .map(|cells| cells.iter().map(|cell| substitute(cell, row)).collect())
                .collect(),
        )),
        (None, None) => None,
    };

    Step {
        keyword: step.keyword.trim().to_string(),
        text: substitute(step.value.trim(), row),
        argument,
        line: step.position.line,
    }
}

/// Replace `<column>` placeholders with the row's values
fn substitute(text: &str, row: &ExampleRow) -> String {
    row.iter().fold(text.to_string(), |acc, (column, value)| {
        acc.replace(&format!("<{}>", column), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REMOVE_SAMPLE_DATA: &str = r#"
@sample-data
Feature: Validate that the sample data is removed

  As a Wazuh user
  I want to remove the sample data

  Background:
    Given The wazuh admin user is logged

  # toast count is one per category
  @smoke
  Scenario: Remove sample data
    When The user navigates to the sample data page
    And The user removes sample data for each category
    Then The remove data success toasts are displayed
"#;

    #[test]
    fn test_parse_feature() {
        let feature = parse_feature_content(REMOVE_SAMPLE_DATA, "remove.feature").unwrap();

        assert_eq!(feature.name, "Validate that the sample data is removed");
        assert_eq!(feature.scenarios.len(), 1);

        let scenario = &feature.scenarios[0];
        assert_eq!(scenario.name, "Remove sample data");
        assert_eq!(scenario.tags, vec!["sample-data", "smoke"]);
        assert_eq!(scenario.background.len(), 1);
        assert_eq!(scenario.background[0].keyword, "Given");
        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(scenario.steps[1].keyword, "And");
        assert_eq!(
            scenario.steps[2].text,
            "The remove data success toasts are displayed"
        );
        assert_eq!(scenario.steps[2].line, 16);
        assert!(scenario.steps.iter().all(|s| s.argument.is_none()));
    }

    #[test]
    fn test_tag_filter_includes_feature_tags() {
        let feature = parse_feature_content(REMOVE_SAMPLE_DATA, "remove.feature").unwrap();
        let tags = vec!["sample-data".to_string(), "smoke".to_string()];
        assert_eq!(feature.scenarios_matching(&tags).count(), 1);

        let tags = vec!["decoders".to_string()];
        assert_eq!(feature.scenarios_matching(&tags).count(), 0);
    }

    #[test]
    fn test_star_step_opens_scenario() {
        let content = r#"
Feature: Decoders
  Scenario: Star steps
    * The wazuh admin user is logged
    * The user navigates to the decoders page
"#;
        let feature = parse_feature_content(content, "star.feature").unwrap();
        let steps = &feature.scenarios[0].steps;

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].keyword, "*");
        assert_eq!(steps[0].display(), "* The wazuh admin user is logged");
    }

    #[test]
    fn test_scenario_description_is_not_a_step() {
        let content = r#"
Feature: Sample data
  Scenario: Remove sample data
    Removing the sample data clears every category.

    When The user removes sample data for each category
"#;
        let feature = parse_feature_content(content, "described.feature").unwrap();
        let steps = &feature.scenarios[0].steps;

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].text, "The user removes sample data for each category");
    }

    #[test]
    fn test_outline_rows_become_scenarios() {
        let content = r#"
@sample-data
Feature: Toasts
  Scenario Outline: Remove <categories> categories
    Then <categories> remove data success toasts are displayed

    @nightly
    Examples:
      | categories |
      | 2          |
      | 3          |
"#;
        let feature = parse_feature_content(content, "outline.feature").unwrap();

        assert_eq!(feature.scenarios.len(), 2);
        assert_eq!(feature.scenarios[0].name, "Remove 2 categories #1");
        assert_eq!(feature.scenarios[1].name, "Remove 3 categories #2");
        assert_eq!(
            feature.scenarios[1].steps[0].text,
            "3 remove data success toasts are displayed"
        );
        assert_eq!(feature.scenarios[0].tags, vec!["sample-data", "nightly"]);
    }

    #[test]
    fn test_rule_background_follows_feature_background() {
        let content = r#"
Feature: Decoders
  Background:
    Given The wazuh admin user is logged

  @edit
  Rule: Editing decoders
    Background:
      Given The user navigates to the decoders page

    Scenario: Edit the first decoder
      When The user edits the first decoder
"#;
        let feature = parse_feature_content(content, "rule.feature").unwrap();
        let scenario = &feature.scenarios[0];

        assert_eq!(scenario.tags, vec!["edit"]);
        let background: Vec<&str> = scenario.background.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            background,
            vec![
                "The wazuh admin user is logged",
                "The user navigates to the decoders page"
            ]
        );
    }

    #[test]
    fn test_step_arguments_are_kept() {
        let content = r#"
Feature: Arguments
  Scenario: Table and doc string
    Given The user adds sample data for each category
      | category |
      | security |
    Then The save confirmation message is displayed
      """
      Saved
      """
"#;
        let feature = parse_feature_content(content, "args.feature").unwrap();
        let steps = &feature.scenarios[0].steps;

        assert_eq!(
            steps[0].argument,
            Some(StepArgument::DataTable(vec![
                vec!["category".to_string()],
                vec!["security".to_string()]
            ]))
        );
        assert!(matches!(&steps[1].argument, Some(StepArgument::DocString(doc)) if doc.contains("Saved")));
    }

    #[test]
    fn test_syntax_error_names_source() {
        let err = parse_feature_content("Scenario: y\n  Given x\n", "broken.feature").unwrap_err();
        assert!(err.to_string().starts_with("broken.feature:"));
    }

    #[test]
    fn test_parse_feature_file_sets_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remove.feature");
        std::fs::write(&path, REMOVE_SAMPLE_DATA).unwrap();

        let feature = parse_feature_file(&path).unwrap();
        assert_eq!(feature.path, path);

        assert!(parse_feature_file(&dir.path().join("missing.feature")).is_err());
    }
}
