pub const USAGE: &str = "\
OVERVIEW: Build sources into binary products

USAGE: swift-build [options]

MODES:
  --configuration <value>        Build with configuration (debug|release) [-c]
  --clean[=<mode>]               Delete artefacts (build|dist) [-k]
  --init <mode>                  Creates a new package (executable|library)
  --fetch                        Fetch package dependencies
  --generate-xcodeproj [<path>]  Generates an Xcode project for this package [-X]
  --lock                         Generates the lockfile
  --ignore-lock                  Ignore lockfile when building
  --version                      Print version information

OPTIONS:
  --chdir <value>    Change working directory before any other operation [-C]
  -v[v]              Increase verbosity of informational output
  -Xcc <flag>        Pass flag through to all C compiler instantiations
  -Xlinker <flag>    Pass flag through to all linker instantiations
  -Xswiftc <flag>    Pass flag through to all Swift compiler instantiations
";

pub fn version_string() -> String {
    format!("swift-build package manager {}", env!("CARGO_PKG_VERSION"))
}

pub fn print_usage() {
    print!("{USAGE}");
}
