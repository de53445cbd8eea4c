//! Variable listener infrastructure for shadow variable updates.
//!
//! A listener is registered on one source variable (genuine or shadow) of
//! one entity collection. The score director notifies it around every change
//! of that variable, in registration order.

/// Lets a listener mutate shadow variables while keeping the score director
/// informed.
///
/// Every shadow mutation must be bracketed by
/// [`before_shadow_changed`](ShadowNotifier::before_shadow_changed) and
/// [`after_shadow_changed`](ShadowNotifier::after_shadow_changed), exactly
/// like moves bracket genuine variable changes. Listeners registered on the
/// changed shadow variable are triggered afterwards.
pub trait ShadowNotifier<S> {
    fn working_solution(&self) -> &S;

    fn working_solution_mut(&mut self) -> &mut S;

    fn before_shadow_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    );

    fn after_shadow_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    );
}

/// A listener that is notified when a source variable changes.
///
/// # Implementation Notes
///
/// - Only modify the shadow variables this listener is responsible for
/// - Never modify genuine variables or problem facts
/// - A listener may update shadow variables on several entities
/// - Listeners registered on shadow variables only receive
///   [`after_variable_changed`](VariableListener::after_variable_changed)
pub trait VariableListener<S>: Send + Sync {
    /// Called before the source variable changes on the entity.
    ///
    /// Use this to capture old state needed for the update.
    fn before_variable_changed(&mut self, _solution: &S, _entity_index: usize) {}

    /// Called after the source variable changed on the entity.
    fn after_variable_changed(&mut self, notifier: &mut dyn ShadowNotifier<S>, entity_index: usize);

    /// Recomputes every shadow variable of this listener from scratch.
    ///
    /// Called when the score director receives a new working solution, before
    /// the score calculator is reset. No notifications are sent.
    fn reset_working_solution(&mut self, solution: &mut S);

    /// Called when the listener is no longer needed.
    fn close(&mut self) {}
}
