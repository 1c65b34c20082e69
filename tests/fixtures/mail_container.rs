// @generated by reinhardt-forge. Do not edit.

use std::any::Any;
use std::sync::Arc;

use reinhardt_forge::runtime::ContainerRuntime;

#[derive(Clone)]
pub struct Container {
	runtime: Arc<ContainerRuntime>,
}

#[allow(dead_code, non_snake_case, unused_mut, clippy::all)]
impl Container {
	pub const ENTRY_POINTS: &'static [(&'static str, &'static str)] = &[
		("app::Mailer", "app__Mailer"),
		("app::Report", "app__Report"),
	];

	pub const HASH_MAP: &'static [(&'static str, &'static str)] = &[
		("app::Mailer", "app__Mailer"),
		("app::Report", "app__Report"),
		("app::Smtp", "app__Smtp"),
		("crate::Container", "crate__Container"),
	];

	pub fn new(runtime: ContainerRuntime) -> Self {
		Self {
			runtime: Arc::new(runtime),
		}
	}

	pub fn has(&self, id: &str) -> bool {
		Self::ENTRY_POINTS.iter().any(|(entry, _)| *entry == id)
	}

	pub fn get(&self, id: &str) -> Option<Box<dyn Any + Send + Sync>> {
		match id {
			"app::Mailer" => Some(Box::new(self.app__Mailer())),
			"app::Report" => Some(Box::new(self.app__Report())),
			_ => None,
		}
	}

	pub fn app__Mailer(&self) -> Arc<app::Mailer> {
		if let Some(entry) = self.runtime.singleton::<Arc<app::Mailer>>("app::Mailer") {
			return entry;
		}

		self.runtime.store_singleton::<Arc<app::Mailer>>("app::Mailer", Arc::new(app::Mailer::new(
			Arc::new(app::Smtp::new()),
			3,
		)))
	}

	pub fn app__Report(&self) -> Arc<app::Report> {
		Arc::new(app::Report::new(
			self.app__Mailer(),
		))
	}

	fn app__Smtp(&self) -> Arc<app::Smtp> {
		Arc::new(app::Smtp::new())
	}

	fn crate__Container(&self) -> Arc<Self> {
		Arc::new(self.clone())
	}
}
