use buildconf_common_base::{
	documented::*,
	field_access::*,
};

/// Documentation for an item's field.
#[derive(Debug)]
pub struct FieldDoc {
	pub name: &'static str,
	pub docs: &'static str,
}

/// Documentation for an item and all of its fields.
#[derive(Debug)]
pub struct ItemDoc {
	pub item_docs: &'static str,
	pub fields: Vec<FieldDoc>,
}

impl ItemDoc {
	/// Use an example value of type `T` to scrape its documentation.
	pub fn new<T: ?Sized + WithDocs>(example: &T) -> Self {
		let fields = example.field_names().iter()
			.filter_map(move |name| {
				let docs = T::get_field_docs(name).ok()?;
				Some(FieldDoc {
					name: *name,
					docs,
				})
			})
			.collect();

		Self {
			item_docs: T::DOCS,
			fields,
		}
	}

	/// Look up a field by its name in `kebab-case`.
	pub fn field_kebab_case(&self, query: &str) -> Option<&FieldDoc> {
		self.fields.iter()
			.find(move |f| f.name.split('_').eq(query.split('-')))
	}
}

/// Trait for documented types that can be used to construct [`ItemDoc`].
pub trait WithDocs: Documented + DocumentedFields + AnyFieldAccess {}
impl<T: Documented + DocumentedFields + AnyFieldAccess> WithDocs for T {}
