use buildconf_common_base::{
	toml_edit::ser::to_document,
	ConfigTemplate,
};
use std::fmt::Write;

use crate::{
	doc_map::ItemDoc,
	anyhow::Result as AResult,
};

/// Create a documented config file with the default values of [`ConfigTemplate`].
///
/// Options without a default value are written commented out, so that they stay unset until edited.
pub fn create_config_template() -> AResult<String> {
	let template = ConfigTemplate::default();
	let docs = ItemDoc::new(&template);
	let document = to_document(&template)?;

	let mut buffer = to_comment(docs.item_docs, false);
	for (key, item) in document.iter() {
		let field_docs = docs.field_kebab_case(key).map(move |f| f.docs).unwrap_or_default();
		buffer.push_str(&to_comment(field_docs, true));

		let value = item.as_str().unwrap_or_default();
		if value.is_empty() {
			buffer.push('#');
		}
		writeln!(buffer, "{key}={value}")?;
	}
	Ok(buffer)
}

fn to_comment(doc: &str, push_nl: bool) -> String {
	const DOC_BEGIN: &str = "# ";
	const DOC_END: &str = "\n";
	const DOC_DECOR_LEN: usize = DOC_BEGIN.len() + DOC_END.len();

	let n_lines = doc.lines().count();
	let mut buffer = String::with_capacity(1 + doc.len() + n_lines * DOC_DECOR_LEN);
	if push_nl {
		buffer.push('\n');
	}

	for line in doc.lines() {
		buffer.push_str(DOC_BEGIN);
		buffer.push_str(line.trim());
		buffer.push_str(DOC_END);
	}
	buffer
}
