//! Search configuration shared by the heuristics and the search driver.

/// Flags controlling how the branch order is chosen and reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Shuffle the colors instead of ranking them.
    pub order_random: bool,
    /// The driver picks the most constrained color at each step instead of
    /// following the branch order. Only changes the summary text here.
    pub order_most_constrained: bool,
    /// Suppress the branch-order summary.
    pub display_quiet: bool,
    /// Forced priorities, as color characters in the order they should be tried.
    /// Colors not listed here are ranked after every listed color.
    pub user_order: Option<String>,
}

impl SearchOptions {
    /// The forced-priority rank of the color named `name`, if `user_order` lists it.
    ///
    /// # Examples
    /// ```
    /// use flow_solver::options::SearchOptions;
    /// let options = SearchOptions {
    ///     user_order: Some("CA".to_string()),
    ///     ..SearchOptions::default()
    /// };
    /// assert_eq!(options.user_rank('C'), Some(0));
    /// assert_eq!(options.user_rank('A'), Some(1));
    /// assert_eq!(options.user_rank('B'), None);
    /// ```
    pub fn user_rank(&self, name: char) -> Option<usize> {
        self.user_order.as_deref()?.chars().position(|c| c == name)
    }
}
