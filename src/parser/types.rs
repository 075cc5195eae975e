use std::path::PathBuf;

/// Block argument attached to a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArgument {
    DocString(String),
    DataTable(Vec<Vec<String>>),
}

impl StepArgument {
    pub fn describe(&self) -> &'static str {
        match self {
            StepArgument::DocString(_) => "a doc string",
            StepArgument::DataTable(_) => "a data table",
        }
    }
}

/// A single step line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Keyword as written (e.g. "And", "*")
    pub keyword: String,
    pub text: String,
    pub argument: Option<StepArgument>,
    pub line: usize,
}

impl Step {
    /// "And The user saves the decoder"
    pub fn display(&self) -> String {
        format!("{} {}", self.keyword, self.text)
    }
}

/// A runnable scenario; outline rows are already expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    /// Own tags plus those inherited from the feature, rule and examples
    pub tags: Vec<String>,
    /// Feature background followed by the rule background, if any
    pub background: Vec<Step>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feature {
    pub name: String,
    pub scenarios: Vec<Scenario>,
    pub path: PathBuf,
}

impl Feature {
    /// Scenarios carrying every required tag; `@smoke` and `smoke` are the same tag
    pub fn scenarios_matching<'a>(
        &'a self,
        required_tags: &'a [String],
    ) -> impl Iterator<Item = &'a Scenario> + 'a {
        self.scenarios.iter().filter(move |scenario| {
            required_tags
                .iter()
                .map(|tag| tag.trim().trim_start_matches('@'))
                .filter(|tag| !tag.is_empty())
                .all(|tag| scenario.tags.iter().any(|t| t == tag))
        })
    }
}
