#![allow(non_snake_case)]

/*!
# 📖 Flowbridge Playbook

Flowbridge connects push-based reactive producers and sinks to callback-driven streaming RPC
transports. It takes care of the tedious parts of the callback API: one read and one write in
flight at a time, ordered writes, deferred half-close, a single terminal event per call and safe
handling of completions which arrive after a call has already ended.

This documentation explains available features. We suggest to begin from the
[Quickstart](crate::docs::a1__quickstart) and then move to other sections.

## Contents

1. Basics
    1. [Quickstart](crate::docs::a1__quickstart)
    1. [Call Shapes](crate::docs::a2__call_shapes)
1. Customization
    1. [Custom Transport](crate::docs::c1__custom_transport)
1. Contributing
    1. [Testing](crate::docs::e1__testing)

<em>[Quickstart →](crate::docs::a1__quickstart)</em>
*/

pub mod a1__quickstart;
pub mod a2__call_shapes;
pub mod c1__custom_transport;
pub mod e1__testing;
