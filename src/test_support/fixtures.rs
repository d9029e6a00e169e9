//! On-disk project fixtures.

use std::fs;
use std::path::Path;

use crate::core::manifest::{Manifest, MANIFEST_NAME};

/// Manifest used by [`create_rtt_project`].
pub const RTT_MANIFEST: &str = r#"
prune = ["topwin"]

[[subbuild]]
name = "components"
dir = "components"
variant-dir = "build/components"

[[subbuild.group]]
name = "rtgui"
src = ["rtgui/common/*.c", "rtgui/server/topwin.c"]
depend = ["RT_USING_RTGUI"]
options = { include-paths = ["rtgui/include"], macro-definitions = ["RTGUI_USING_SMALL_SIZE"] }

[[subbuild.group]]
name = "lua"
src = ["lua/lua.c"]
depend = "RT_USING_LUA"
options = { compile-flags = ["-DLUA_ANSI"] }

[[subbuild]]
name = "win32"
dir = "win32"
define = ["RT_USING_SDL"]

[[subbuild.group]]
name = "kernel"
src = ["thread.c", "timer.c"]
depend = ""
options = { compile-flags = ["/DWIN32"] }
"#;

/// Write an empty file, creating parent directories.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

/// Create a small two-sub-build project under `root` and return its manifest.
///
/// Sub-build `components` declares `rtgui` (3 sources) and `lua` (denied by
/// the default profile); sub-build `win32` declares `kernel` (2 sources).
pub fn create_rtt_project(root: &Path) -> Manifest {
    for file in [
        "components/rtgui/common/dc.c",
        "components/rtgui/common/font.c",
        "components/rtgui/server/topwin.c",
        "components/rtgui/include/rtgui.h",
        "components/lua/lua.c",
        "win32/thread.c",
        "win32/timer.c",
    ] {
        touch(&root.join(file));
    }

    fs::write(root.join(MANIFEST_NAME), RTT_MANIFEST).unwrap();
    Manifest::parse(RTT_MANIFEST).unwrap()
}
