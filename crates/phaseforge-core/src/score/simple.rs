//! Single-level score.

level_score! {
    /// A score with one level and no notion of hard constraints.
    ///
    /// Feasible when the value is zero or positive. The textual form is the
    /// bare number.
    ///
    /// ```
    /// use phaseforge_core::SimpleScore;
    ///
    /// assert!(SimpleScore::of(-1) < SimpleScore::of(0));
    /// assert_eq!(format!("{}", SimpleScore::of(-3)), "-3");
    /// ```
    SimpleScore { score: Hard => "" }
    feasible: |s| s.score >= 0;
}

impl SimpleScore {
    pub const ONE: SimpleScore = SimpleScore::of(1);
}
