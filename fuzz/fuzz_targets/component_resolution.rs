#![no_main]

use libfuzzer_sys::fuzz_target;
use scoped_di::{ComponentDescriptor, Container, DiError, Key, ScopeId};

const SCOPES: [ScopeId; 5] = [
    ScopeId::TRANSIENT,
    ScopeId::SINGLETON,
    ScopeId::THREAD,
    ScopeId::CONCURRENT,
    ScopeId::TRANSIENT,
];

// Each input byte triple registers one component: (slot, scope, dependency slot).
// Resolution of every slot must either succeed or fail with a known error,
// never panic. Singletons of either kind get no dependencies, so they never
// sit on a cycle (a cycle through a build gate deadlocks).
fuzz_target!(|data: &[u8]| {
    let container = Container::new();

    for chunk in data.chunks_exact(3).take(64) {
        let slot = chunk[0] % 16;
        let scope = SCOPES[(chunk[1] % 5) as usize].clone();
        let dependency = chunk[2] % 17;

        let mut descriptor = ComponentDescriptor::of(move |args| Ok(args.len() + slot as usize));
        if dependency < 16 && scope != ScopeId::SINGLETON && scope != ScopeId::CONCURRENT {
            descriptor = descriptor.depends_on("dep", Key::name(format!("c{}", dependency)));
        }
        container.register(format!("c{}", slot), descriptor.in_scope(scope));
    }

    for slot in 0..16 {
        match container.instance_for(format!("c{}", slot)) {
            Ok(_)
            | Err(DiError::UnknownComponent(_))
            | Err(DiError::DepthExceeded(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
});
