//! Supertype mapping, grounded on `map_instance_to_supertype`/
//! `map_instance_to_direct_supertype`/`map_instance_to_interface_supertypes`
//! in `subtypes.py`.

use veritype_common::limits::MAX_SUPERTYPE_CHAIN_DEPTH;

use crate::algebra::expand::{expand, type_var_map};
use crate::hierarchy::ClassHierarchy;
use crate::type_def::{ClassId, Instance, Type};

/// Map `instance`, including its type arguments, to the corresponding
/// instance of `target`. Assumes `target` actually is a supertype of
/// `instance`'s class.
pub fn map_instance_to_supertype(
    hierarchy: &dyn ClassHierarchy,
    instance: &Instance,
    target: ClassId,
) -> Instance {
    if instance.class == target {
        return instance.clone();
    }

    if hierarchy.type_var_count(target) == 0 {
        return Instance::new(target, Vec::new());
    }

    if hierarchy.is_interface(target) {
        return map_instance_to_interface_supertypes(hierarchy, instance, target)
            .into_iter()
            .next()
            .unwrap_or_else(|| Instance::new(target, Vec::new()));
    }

    let mut current = instance.clone();
    for _ in 0..MAX_SUPERTYPE_CHAIN_DEPTH {
        let Some(super_class) = hierarchy.superclass(current.class) else {
            break;
        };
        current = map_instance_to_direct_supertype(hierarchy, &current, super_class);
        if current.class == target {
            return current;
        }
    }
    current
}

/// Walk one step up `instance`'s declared base-type list toward
/// `target_super`, substituting `instance`'s own type arguments. Falls back
/// to implicit `Any` arguments when the relationship was never spelled out
/// explicitly in source.
fn map_instance_to_direct_supertype(
    hierarchy: &dyn ClassHierarchy,
    instance: &Instance,
    target_super: ClassId,
) -> Instance {
    let map = type_var_map(&instance.args);
    for base in hierarchy.base_types(instance.class) {
        if let Type::Instance(base_inst) = base {
            if base_inst.class == target_super {
                if let Type::Instance(expanded) = expand(base, &map) {
                    return *expanded;
                }
            }
        }
    }
    Instance::new(target_super, vec![Type::Any; hierarchy.type_var_count(target_super)])
}

fn map_instance_to_direct_supertypes(
    hierarchy: &dyn ClassHierarchy,
    instance: &Instance,
    target_super: ClassId,
) -> Vec<Instance> {
    let map = type_var_map(&instance.args);
    let mut result = Vec::new();
    for base in hierarchy.base_types(instance.class) {
        if let Type::Instance(base_inst) = base {
            if base_inst.class == target_super {
                if let Type::Instance(expanded) = expand(base, &map) {
                    result.push(*expanded);
                }
            }
        }
    }
    if result.is_empty() {
        result.push(Instance::new(
            target_super,
            vec![Type::Any; hierarchy.type_var_count(target_super)],
        ));
    }
    result
}

fn map_instance_to_interface_supertypes(
    hierarchy: &dyn ClassHierarchy,
    instance: &Instance,
    target: ClassId,
) -> Vec<Instance> {
    let mut result = Vec::new();
    for path in interface_implementation_paths(hierarchy, instance.class, target) {
        let mut types = vec![instance.clone()];
        for step in path {
            let mut next = Vec::new();
            for t in &types {
                next.extend(map_instance_to_direct_supertypes(hierarchy, t, step));
            }
            types = next;
        }
        result.extend(types);
    }
    result
}

/// Non-empty paths of direct supertypes from `class` to `target`.
fn interface_implementation_paths(
    hierarchy: &dyn ClassHierarchy,
    class: ClassId,
    target: ClassId,
) -> Vec<Vec<ClassId>> {
    fn go(
        hierarchy: &dyn ClassHierarchy,
        class: ClassId,
        target: ClassId,
        depth: usize,
    ) -> Vec<Vec<ClassId>> {
        if depth >= MAX_SUPERTYPE_CHAIN_DEPTH {
            return Vec::new();
        }
        let mut result = Vec::new();
        if hierarchy.superclass(class) == Some(target) || hierarchy.interfaces(class).contains(&target) {
            result.push(vec![target]);
        }
        if let Some(base) = hierarchy.superclass(class) {
            for mut path in go(hierarchy, base, target, depth + 1) {
                let mut full = vec![base];
                full.append(&mut path);
                result.push(full);
            }
        }
        for iface in hierarchy.interfaces(class) {
            for mut path in go(hierarchy, *iface, target, depth + 1) {
                let mut full = vec![*iface];
                full.append(&mut path);
                result.push(full);
            }
        }
        result
    }
    go(hierarchy, class, target, 0)
}
