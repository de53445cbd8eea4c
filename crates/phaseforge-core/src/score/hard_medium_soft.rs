//! Three-level score for problems that may leave work unassigned.

level_score! {
    /// Hard constraints, then a medium level, then the soft objective.
    ///
    /// The medium level usually counts work left unassigned, so that a
    /// solver prefers staffing one more shift over any soft gain. Written as
    /// `"0hard/-1medium/-3soft"`.
    ///
    /// ```
    /// use phaseforge_core::HardMediumSoftScore;
    ///
    /// let understaffed = HardMediumSoftScore::of(0, -1, 0);
    /// assert!(HardMediumSoftScore::of(0, 0, -40) > understaffed);
    /// assert!(understaffed > HardMediumSoftScore::of_hard(-1));
    /// ```
    HardMediumSoftScore {
        hard: Hard => "hard",
        medium: Medium => "medium",
        soft: Soft => "soft",
    }
    feasible: |s| s.hard >= 0;
}

impl HardMediumSoftScore {
    pub const fn of_hard(hard: i64) -> Self {
        Self::of(hard, 0, 0)
    }

    pub const fn of_medium(medium: i64) -> Self {
        Self::of(0, medium, 0)
    }

    pub const fn of_soft(soft: i64) -> Self {
        Self::of(0, 0, soft)
    }

    /// Whether nothing counted on the medium level is missing.
    pub const fn is_fully_assigned(&self) -> bool {
        self.medium >= 0
    }
}
