use buildconf_common_build::{
	anyhow::{
		anyhow, Result as AResult,
	},
	create_config_template,
};
use std::{
	env::var_os,
	fs::File,
	io::Write,
	path::PathBuf,
};

fn main() -> AResult<()> {
	println!("cargo::rerun-if-changed=buildconf-common-base/src/template.rs");

	let out_dir = PathBuf::from(var_os("OUT_DIR").expect("`OUT_DIR` should be set for the build script"));

	// Create config template.
	{
		let template_path = out_dir.join("config.template");
		let template = create_config_template()?;
		let mut template_file = File::options()
			.create(true).truncate(true)
			.write(true)
			.open(&template_path)
			.map_err(|e| anyhow!("Couldn't open config template at {template_path:?}: {e}"))?;
		write!(template_file, "{template}")?;
	}

	Ok(())
}
