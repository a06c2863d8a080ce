/*! Integration tests for formstate.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure follows the engine's components:
 * - paths: Path parsing and reads/writes on value trees
 * - status: Dirty and touched tracking through the form API
 * - validation: Rule trees, resolvers, validate triggers and built-in validators
 * - lists: List operators and the re-indexing of every path-keyed entry
 * - watch: Watchers and the no-op short circuit
 * - form: Modes, initialize/reset, input props and the full commit pipeline
 * - submit: Sync and async submit flows
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("formstate=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod form;
mod helpers;
mod lists;
mod paths;
mod status;
mod watch;
