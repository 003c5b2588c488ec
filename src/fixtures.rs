#[cfg(test)]
pub mod test {
    use std::path::PathBuf;

    use tempfile::TempDir;

    /// A flat section plus a cross-section interpolation.
    pub const BASIC: &str = "\
[basic]
jobname:  test run
verbose:  True
tasks:    4
mesh:     [8, 8, 8]

[output]
file:     ${basic:jobname}.log
";

    /// A section with a dotted sub-section.
    pub const NESTED: &str = "\
[relax]
driver:   BFGS
fmax:     0.001

[relax.kwargs]
maxstep:  0.2
logfile:  relax.log
";

    /// Write `content` under `name` inside `dir`, returning the full path.
    pub fn write_conf(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}
