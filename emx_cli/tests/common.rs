use assert_cmd::Command;

pub fn emx_cmd() -> Command {
	let mut cmd =
		Command::cargo_bin("emx").unwrap_or_else(|_| panic!("emx binary not found in build dir"));
	cmd.env("NO_COLOR", "1");
	cmd
}
