use super::problem::Problem;

/// Where the user last was inside a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStatus {
    pub index: usize,
    pub viewport_start: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Container(Container),
    Problem(Problem),
}

impl Entry {
    pub fn label(&self) -> String {
        match self {
            Entry::Container(container) => container.label(),
            Entry::Problem(problem) => problem.label(),
        }
    }
}

/// A named, ordered list of entries: the root menu, a judge catalogue or a contest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub name: String,
    pub entries: Vec<Entry>,
    pub status: Option<ViewStatus>,
}

impl Container {
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries,
            status: None,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.len())
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(Entry::label).collect()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn find_container(&self, name: &str) -> Option<&Container> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Container(c) if c.name == name => Some(c),
            _ => None,
        })
    }

    pub fn problems(&self) -> impl Iterator<Item = &Problem> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Problem(p) => Some(p),
            Entry::Container(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProblemId;

    #[test]
    fn test_labels() {
        let contest = Container::new(
            "4",
            vec![Entry::Problem(Problem {
                name: "Watermelon".to_string(),
                solved_count: 10,
                ..Problem::from_id(ProblemId::new(4, "A"))
            })],
        );
        let root = Container::new("Codeforces", vec![Entry::Container(contest)]);

        assert_eq!(root.label(), "Codeforces (1)");
        assert_eq!(root.labels(), vec!["4 (1)".to_string()]);

        let contest = root.find_container("4").unwrap();
        assert_eq!(contest.labels(), vec!["4/A: Watermelon (solved=10)".to_string()]);
        assert_eq!(contest.problems().count(), 1);
        assert!(root.find_container("5").is_none());
    }
}
