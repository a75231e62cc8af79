use super::capability::UnsupportedReason;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LayoutStatus {
	#[default]
	Loading,
	Complete {
		elapsed_ms: f64,
	},
	Unsupported(UnsupportedReason),
	Failed(String),
}

/// Page-visible progress of the single layout request.
///
/// Leaves `Loading` at most once; later transitions are refused.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutState {
	status: LayoutStatus,
}

impl LayoutState {
	pub fn is_loading(&self) -> bool {
		self.status == LayoutStatus::Loading
	}

	pub fn elapsed_secs(&self) -> f64 {
		match self.status {
			LayoutStatus::Complete { elapsed_ms } => elapsed_ms / 1000.0,
			_ => 0.0,
		}
	}

	/// Returns `false` when a result was already accepted or the run ended.
	pub fn complete(&mut self, elapsed_ms: f64) -> bool {
		self.settle(LayoutStatus::Complete { elapsed_ms })
	}

	pub fn fail(&mut self, message: impl Into<String>) -> bool {
		self.settle(LayoutStatus::Failed(message.into()))
	}

	pub fn unsupported(&mut self, reason: UnsupportedReason) -> bool {
		self.settle(LayoutStatus::Unsupported(reason))
	}

	/// Text for the status line, if the run did not complete normally.
	pub fn status_message(&self) -> Option<String> {
		match &self.status {
			LayoutStatus::Unsupported(reason) => Some(format!("Offscreen layout unavailable: {reason}")),
			LayoutStatus::Failed(message) => Some(format!("Layout failed: {message}")),
			LayoutStatus::Loading | LayoutStatus::Complete { .. } => None,
		}
	}

	fn settle(&mut self, next: LayoutStatus) -> bool {
		if !self.is_loading() {
			return false;
		}
		self.status = next;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_loading_with_zero_elapsed() {
		let state = LayoutState::default();
		assert!(state.is_loading());
		assert_eq!(state.elapsed_secs(), 0.0);
		assert_eq!(state.status_message(), None);
	}

	#[test]
	fn completion_clears_loading_once() {
		let mut state = LayoutState::default();
		assert!(state.complete(1250.0));
		assert!(!state.is_loading());
		assert_eq!(state.elapsed_secs(), 1.25);

		// An unsolicited second result is ignored.
		assert!(!state.complete(9000.0));
		assert_eq!(state.elapsed_secs(), 1.25);
		assert!(!state.is_loading());
	}

	#[test]
	fn failure_after_completion_is_ignored() {
		let mut state = LayoutState::default();
		assert!(state.complete(10.0));
		assert!(!state.fail("worker crashed"));
		assert_eq!(state.status_message(), None);
	}

	#[test]
	fn unsupported_is_a_named_state() {
		let mut state = LayoutState::default();
		assert!(state.unsupported(UnsupportedReason::NoOffscreenCanvas));
		assert!(!state.is_loading());
		assert_eq!(
			state.status_message().as_deref(),
			Some("Offscreen layout unavailable: OffscreenCanvas is not supported")
		);
		assert!(!state.complete(5.0));
	}

	#[test]
	fn failure_reports_message() {
		let mut state = LayoutState::default();
		assert!(state.fail("missing field `vertexNum`"));
		assert_eq!(
			state.status_message().as_deref(),
			Some("Layout failed: missing field `vertexNum`")
		);
	}
}
