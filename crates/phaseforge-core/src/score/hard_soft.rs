//! Two-level score: hard constraints, then the soft objective.

level_score! {
    /// A score with separate hard and soft levels.
    ///
    /// Hard levels are compared first; soft levels only break ties. Written
    /// as `"-1hard/-20soft"`.
    ///
    /// ```
    /// use phaseforge_core::HardSoftScore;
    ///
    /// let broken = HardSoftScore::of(-1, -100);
    /// let poor = HardSoftScore::of(0, -200);
    /// assert!(poor > broken);
    /// assert!(HardSoftScore::of(0, -50) > poor);
    /// ```
    HardSoftScore { hard: Hard => "hard", soft: Soft => "soft" }
    feasible: |s| s.hard >= 0;
}

impl HardSoftScore {
    pub const ONE_HARD: HardSoftScore = HardSoftScore::of(1, 0);

    pub const ONE_SOFT: HardSoftScore = HardSoftScore::of(0, 1);

    pub const fn of_hard(hard: i64) -> Self {
        Self::of(hard, 0)
    }

    pub const fn of_soft(soft: i64) -> Self {
        Self::of(0, soft)
    }
}
