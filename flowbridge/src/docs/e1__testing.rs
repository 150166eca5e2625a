/*!
# 📖 3.1. Testing

<em>[← Custom Transport](crate::docs::c1__custom_transport)</em>

Flowbridge has several feature flags, so the proper testing requires a few runs. Here is the list
of commands that has to pass before a change is merged.

Unit and integration tests:

```shell
cargo test --no-default-features --lib --tests
cargo test --features sync,async,test_utils --lib --tests
cargo test --all-features --lib --tests
```

Documentation tests:

```shell
cargo test --no-default-features --features test_utils --doc
cargo test --all-features --doc
```

Building a documentation:

```shell
cargo doc --no-deps --all-features
```

Use `RUST_LOG=flowbridge=trace` to see what reactors are doing.

<em>[← Custom Transport](crate::docs::c1__custom_transport)</em>
 */
