//! Which targets a run touches

/// Targets picked on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every target in database order
    All,
    /// A single target, 1-based
    One(usize),
    /// Anything else; nothing is touched
    Nothing,
}

impl Selection {
    /// Interpret the positional argument for a database of `count` targets
    pub fn parse(arg: &str, count: usize) -> Self {
        if arg == "all" {
            return Selection::All;
        }
        match arg.trim().parse::<usize>() {
            Ok(k) if (1..=count).contains(&k) => Selection::One(k),
            _ => Selection::Nothing,
        }
    }

    /// Line printed before any work starts
    pub fn announcement(&self) -> String {
        match self {
            Selection::All => "Change all files.".to_string(),
            Selection::One(k) => format!("Change file  {}", k),
            Selection::Nothing => "No file is changed.".to_string(),
        }
    }

    /// 0-based indices of the selected targets
    pub fn indices(&self, count: usize) -> Vec<usize> {
        match *self {
            Selection::All => (0..count).collect(),
            Selection::One(k) if k >= 1 && k <= count => vec![k - 1],
            _ => Vec::new(),
        }
    }
}
