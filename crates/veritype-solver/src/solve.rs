//! Solves a constraint set into one type per variable by folding all lower
//! bounds with `join` and all upper bounds with `meet`, then checking the
//! result is consistent.

use rustc_hash::FxHashMap;

use veritype_types::algebra::{is_subtype, join_types, meet_types};
use veritype_types::{BasicTypes, ClassHierarchy, Type};

use crate::constraint::{Constraint, ConstraintOp};

/// One variable's resolved type, or `None` if its bounds are inconsistent
/// (lower bound not a subtype of upper bound) or it has no constraints at all.
#[tracing::instrument(level = "debug", skip(constraints, hierarchy, basic), fields(vars = vars.len(), constraints = constraints.len()))]
pub fn solve_constraints(
    vars: &[i32],
    constraints: &[Constraint],
    hierarchy: &dyn ClassHierarchy,
    basic: &BasicTypes,
) -> FxHashMap<i32, Option<Type>> {
    let mut result = FxHashMap::default();
    for &var in vars {
        let lowers: Vec<&Type> = constraints
            .iter()
            .filter(|c| c.var_id == var && matches!(c.op, ConstraintOp::SupertypeOf))
            .map(|c| &c.target)
            .collect();
        let uppers: Vec<&Type> = constraints
            .iter()
            .filter(|c| c.var_id == var && matches!(c.op, ConstraintOp::SubtypeOf))
            .map(|c| &c.target)
            .collect();

        if lowers.is_empty() && uppers.is_empty() {
            tracing::trace!(var, "no constraints on type variable, leaving unsolved");
            result.insert(var, None);
            continue;
        }

        if lowers.iter().any(|t| t.is_any()) || uppers.iter().any(|t| t.is_any()) {
            tracing::trace!(var, "bound touches Any, solving to Any");
            result.insert(var, Some(Type::Any));
            continue;
        }

        let bottom = lowers
            .into_iter()
            .cloned()
            .reduce(|acc, t| join_types(hierarchy, basic, &acc, &t))
            .unwrap_or(Type::NoneType);

        if uppers.is_empty() {
            tracing::trace!(var, "no upper bound, solving to joined lower bound");
            result.insert(var, Some(bottom));
            continue;
        }

        let top = uppers
            .into_iter()
            .cloned()
            .reduce(|acc, t| meet_types(hierarchy, basic, &acc, &t))
            .unwrap();

        if matches!(bottom, Type::NoneType) || is_subtype(hierarchy, &bottom, &top) {
            result.insert(var, Some(bottom));
        } else {
            tracing::debug!(var, "lower bound is not a subtype of upper bound, leaving unsolved");
            result.insert(var, None);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_types::ClassId;

    struct LinearHierarchy;
    impl ClassHierarchy for LinearHierarchy {
        fn full_name(&self, class: ClassId) -> &str {
            match class.0 {
                0 => "object",
                1 => "Animal",
                2 => "Dog",
                _ => "?",
            }
        }
        fn is_interface(&self, _class: ClassId) -> bool {
            false
        }
        fn superclass(&self, class: ClassId) -> Option<ClassId> {
            match class.0 {
                2 => Some(ClassId(1)),
                1 => Some(ClassId(0)),
                _ => None,
            }
        }
        fn interfaces(&self, _class: ClassId) -> &[ClassId] {
            &[]
        }
        fn type_var_count(&self, _class: ClassId) -> usize {
            0
        }
        fn base_types(&self, _class: ClassId) -> &[Type] {
            &[]
        }
        fn has_base(&self, class: ClassId, full_name: &str) -> bool {
            let mut cur = Some(class);
            while let Some(c) = cur {
                if self.full_name(c) == full_name {
                    return true;
                }
                cur = self.superclass(c);
            }
            false
        }
        fn object_class(&self) -> ClassId {
            ClassId(0)
        }
    }

    fn basic() -> BasicTypes {
        BasicTypes {
            object: ClassId(0),
            std_type: ClassId(0),
            tuple: ClassId(0),
            function: ClassId(0),
        }
    }

    #[test]
    fn no_constraints_is_unsolved() {
        let h = LinearHierarchy;
        let b = basic();
        let result = solve_constraints(&[1], &[], &h, &b);
        assert_eq!(result[&1], None);
    }

    #[test]
    fn single_lower_bound_solves_to_itself() {
        let h = LinearHierarchy;
        let b = basic();
        let dog = Type::instance(ClassId(2), vec![]);
        let cs = vec![Constraint::new(1, ConstraintOp::SupertypeOf, dog.clone())];
        let result = solve_constraints(&[1], &cs, &h, &b);
        assert!(matches!(result[&1], Some(Type::Instance(ref i)) if i.class == ClassId(2)));
    }

    #[test]
    fn consistent_bounds_solve_to_lower_bound() {
        let h = LinearHierarchy;
        let b = basic();
        let dog = Type::instance(ClassId(2), vec![]);
        let animal = Type::instance(ClassId(1), vec![]);
        let cs = vec![
            Constraint::new(1, ConstraintOp::SupertypeOf, dog.clone()),
            Constraint::new(1, ConstraintOp::SubtypeOf, animal),
        ];
        let result = solve_constraints(&[1], &cs, &h, &b);
        assert!(matches!(result[&1], Some(Type::Instance(ref i)) if i.class == ClassId(2)));
    }

    #[test]
    fn inconsistent_bounds_are_unsolved() {
        let h = LinearHierarchy;
        let b = basic();
        let animal = Type::instance(ClassId(1), vec![]);
        let dog = Type::instance(ClassId(2), vec![]);
        let cs = vec![
            Constraint::new(1, ConstraintOp::SupertypeOf, animal),
            Constraint::new(1, ConstraintOp::SubtypeOf, dog),
        ];
        let result = solve_constraints(&[1], &cs, &h, &b);
        assert_eq!(result[&1], None);
    }

    #[test]
    fn any_constraint_promotes_whole_variable_to_any() {
        let h = LinearHierarchy;
        let b = basic();
        let cs = vec![Constraint::new(1, ConstraintOp::SupertypeOf, Type::Any)];
        let result = solve_constraints(&[1], &cs, &h, &b);
        assert!(matches!(result[&1], Some(Type::Any)));
    }
}
