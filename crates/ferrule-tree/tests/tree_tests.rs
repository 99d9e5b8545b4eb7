use ferrule_tree::*;

fn test_type() -> TypeRef {
    TypeRef::new(1, "Test")
}

// ============================================================================
// Class Queries
// ============================================================================

#[test]
fn test_member_ids_follow_insertion() {
    let mut class = ClassDecl::class(test_type())
        .with_member(FieldDecl::new("a", "int"))
        .with_member(MethodDecl::new("run", "void"));
    let ctor = class.insert_member(1, ConstructorDecl::new("init"));

    assert_eq!(ctor, MemberId::new(1));
    let ids: Vec<MemberId> = class.constructors().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![MemberId::new(1)]);
    assert!(class.class_initializer().is_none());

    let init = class.push_member(MethodDecl::class_initializer("initialize"));
    assert_eq!(class.class_initializer_id(), Some(init));
}

#[test]
fn test_inner_class_has_outer_chain() {
    let inner =
        ClassDecl::class(TypeRef::new(2, "Test_Inner")).with_outer(OuterLink::new(test_type()));
    assert!(inner.is_inner());
    assert!(!ClassDecl::class(test_type()).is_inner());
    assert_eq!(inner.outer[0].field, "this$0");
    assert_eq!(inner.outer[0].param, "outer$");
}

#[test]
fn test_type_ref_equality_is_by_id() {
    assert_eq!(TypeRef::new(1, "Test"), TypeRef::new(1, "Renamed"));
    assert_ne!(TypeRef::new(1, "Test"), TypeRef::new(2, "Test"));
}

// ============================================================================
// Lowered Constructor Queries
// ============================================================================

#[test]
fn test_lowered_forms_report_their_invocation() {
    let guarded = ConstructorDecl::new("init").with_body(vec![
        Statement::AllocationGuard(AllocationGuard {
            invocation: ConstructorInvocation::super_call("init", vec![]),
            body: Block::new(vec![Statement::expr(Expression::int(1))]),
            span: Span::synthetic(),
        }),
        Statement::ret(Some(Expression::self_ref())),
    ]);
    assert!(guarded.is_lowered());
    assert_eq!(guarded.leading_invocation().unwrap().kind, InvocationKind::Super);
    assert_eq!(guarded.guarded_statements().unwrap().len(), 1);

    let delegation = ConstructorInvocation::this_call("initWithInt:", vec![]);
    let returned = ConstructorDecl::new("init").with_body(vec![Statement::ret(Some(
        Expression::HookCall(HookCall {
            hook: "JreMemDebugAdd".to_string(),
            argument: Box::new(Expression::Initialize(delegation)),
            span: Span::synthetic(),
        }),
    ))]);
    assert!(returned.is_lowered());
    assert!(returned.leading_invocation().unwrap().is_delegation());
    assert!(returned.guarded_statements().is_none());

    let source =
        ConstructorDecl::new("init").with_body(vec![Statement::this_call("initWithInt:", vec![])]);
    assert!(!source.is_lowered());
    assert!(source.leading_invocation().unwrap().is_delegation());
}

// ============================================================================
// Pretty Printing
// ============================================================================

#[test]
fn test_class_pretty_print() {
    let owner = test_type();
    let class = ClassDecl::class(owner.clone())
        .with_member(
            FieldDecl::new("count", "int")
                .with_static()
                .with_initializer(Expression::int(0)),
        )
        .with_member(FieldDecl::new("name", "NSString *"))
        .with_member(InitializerBlock::instance(vec![Statement::expr(Expression::assign(
            Expression::field(FieldRef::instance(&owner, "name")),
            Expression::string("a\"b"),
        ))]));

    assert_eq!(
        class.pretty_print(),
        "@implementation Test\n\
         static int Test_count_ = 0;\n\
         NSString * name_;\n\
         {\n\
         \x20 name_ = @\"a\\\"b\";\n\
         }\n\
         @end\n"
    );
}

#[test]
fn test_new_with_outer_instance_passes_it_first() {
    let mut expr = Expression::new_instance(
        TypeRef::new(2, "Test_Inner"),
        "initWithTest:withInt:",
        vec![Expression::int(3)],
    );
    if let Expression::New(new) = &mut expr {
        new.outer = Some(Box::new(Expression::self_ref()));
    }
    assert_eq!(expr.pretty_print(), "[[Test_Inner alloc] initWithTest:self withInt:3]");
}
