use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::{tempdir, NamedTempFile};

fn scene_file(xml: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp scene");
    tmp.write_all(xml.as_bytes()).expect("write scene");
    tmp
}

fn glyph_glow() -> Command {
    Command::cargo_bin("glyph-glow").expect("binary exists")
}

const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

#[test]
fn default_scene_summary_lists_every_object() {
    let mut cmd = glyph_glow();
    cmd.arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Loaded scene with 3 objects (ambient intensity 0.439)"))
        .stdout(contains(" - letter 'S' (plastic) at (-10.00, 0.00, 0.00)"))
        .stdout(contains(" - digit '9' (metal) at (10.00, 0.00, 0.00)"))
        .stdout(contains(" - cube (glow) at (0.00, 0.00, 0.00), 12 triangles"))
        .stdout(contains("Final state after 0 frame(s): time=0.000"))
        .stdout(contains("Shading probe:"))
        .stdout(contains(" - cube samples=24"));
}

#[test]
fn held_keys_move_cube_and_camera() {
    let mut cmd = glyph_glow();
    cmd.args(["--summary-only", "--frames", "10", "--hold", "WA"]);
    cmd.assert()
        .success()
        .stdout(contains("Final state after 10 frame(s): time=0.160"))
        .stdout(contains(" - cube pos=(0.00, 1.00, 0.00) rot=(0.050, 0.050, 0.000)"))
        .stdout(contains(" - camera pos=(-1.00, 0.00, 30.00)"))
        .stdout(contains(" - light pos=(0.00, 0.90, 0.00)"));
}

#[test]
fn scene_file_overrides_text_and_layout() {
    let scene = scene_file(
        r#"<scene>
  <name>Ada</name>
  <student-id>42</student-id>
  <letter><position>-6 2 0</position></letter>
  <controls><cube-down>ArrowDown</cube-down></controls>
</scene>
"#,
    );
    let mut cmd = glyph_glow();
    cmd.arg(scene.path())
        .args(["--summary-only", "--frames", "5", "--hold", "ArrowDown,"]);
    cmd.assert()
        .success()
        .stdout(contains("ambient intensity 0.242"))
        .stdout(contains(" - letter 'a' (plastic) at (-6.00, 2.00, 0.00)"))
        .stdout(contains(" - digit '2' (metal)"))
        .stdout(contains(" - cube pos=(0.00, -0.50, 0.00)"));
}

#[test]
fn glyphs_load_from_font_directory() {
    let dir = tempdir().expect("temp dir");
    let glyphs = dir.path().join("glyphs");
    fs::create_dir(&glyphs).expect("glyph dir");
    fs::write(glyphs.join("a.obj"), TRIANGLE_OBJ).expect("letter glyph");
    fs::write(glyphs.join("2.obj"), TRIANGLE_OBJ).expect("digit glyph");
    let scene = dir.path().join("scene.xml");
    fs::write(
        &scene,
        "<scene><name>Ada</name><student-id>42</student-id><font>glyphs</font></scene>",
    )
    .expect("scene file");

    let mut cmd = glyph_glow();
    cmd.arg(&scene).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains(" - letter 'a' (plastic) at (-10.00, 0.00, 0.00), 1 triangles"))
        .stdout(contains(" - digit '2' (metal) at (10.00, 0.00, 0.00), 1 triangles"));
}

#[test]
fn missing_glyph_aborts_with_context() {
    let dir = tempdir().expect("temp dir");
    let scene = dir.path().join("scene.xml");
    fs::write(
        &scene,
        "<scene><name>Ada</name><font>empty</font></scene>",
    )
    .expect("scene file");

    let mut cmd = glyph_glow();
    cmd.arg(&scene).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("failed to build glyph for letter 'a'"));
}

#[test]
fn invalid_scene_reports_the_problem() {
    let scene = scene_file("<scene><camera><fov>200</fov></camera></scene>");
    let mut cmd = glyph_glow();
    cmd.arg(scene.path()).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("camera fov must lie in (0, 180) degrees"));
}

#[test]
fn unknown_flag_is_rejected() {
    let mut cmd = glyph_glow();
    cmd.arg("--bogus");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --bogus"));
}
