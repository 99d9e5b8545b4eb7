//! Pretty-printing for the tree
//!
//! Renders declarations and statements as target-language-like text, one
//! statement per line. The output is for debugging and for tests that check
//! statement order; the production printer lives elsewhere in the pipeline.

use crate::decl::{
    ClassDecl, ConstructorDecl, FieldDecl, InitializerBlock, Member, MethodDecl, Param,
};
use crate::expression::*;
use crate::statement::*;
use std::fmt::Write;

/// Trait for pretty-printing tree nodes
pub trait PrettyPrint {
    /// Render this node as text
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for ClassDecl {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        printer.line(&format!("@implementation {}", self.name()));
        for member in &self.members {
            printer.member(self, member);
        }
        printer.line("@end");
        printer.finish()
    }
}

impl PrettyPrint for ConstructorDecl {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        printer.constructor(self);
        printer.finish()
    }
}

impl PrettyPrint for MethodDecl {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        printer.method(self);
        printer.finish()
    }
}

impl PrettyPrint for Statement {
    fn pretty_print(&self) -> String {
        let mut printer = Printer::default();
        printer.statement(self);
        printer.finish()
    }
}

impl PrettyPrint for Expression {
    fn pretty_print(&self) -> String {
        format_expr(self)
    }
}

#[derive(Default)]
struct Printer {
    output: String,
    indent: usize,
}

impl Printer {
    fn finish(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str) {
        writeln!(self.output, "{}{}", "  ".repeat(self.indent), text).unwrap();
    }

    fn nested(&mut self, statements: &[Statement]) {
        self.indent += 1;
        for stmt in statements {
            self.statement(stmt);
        }
        self.indent -= 1;
    }

    fn member(&mut self, class: &ClassDecl, member: &Member) {
        match member {
            Member::Field(field) => self.field(class, field),
            Member::Initializer(block) => self.initializer(block),
            Member::Constructor(ctor) => self.constructor(ctor),
            Member::Method(method) => self.method(method),
        }
    }

    fn field(&mut self, class: &ClassDecl, field: &FieldDecl) {
        let mut text = if field.is_static() {
            format!("static {} {}", field.ty, static_field_name(class.name(), &field.name))
        } else {
            format!("{} {}", field.ty, instance_field_name(&field.name))
        };
        if let Some(init) = &field.initializer {
            write!(text, " = {}", format_expr(init)).unwrap();
        }
        text.push(';');
        self.line(&text);
    }

    fn initializer(&mut self, block: &InitializerBlock) {
        self.line(if block.is_static { "static {" } else { "{" });
        self.nested(&block.body.statements);
        self.line("}");
    }

    fn constructor(&mut self, ctor: &ConstructorDecl) {
        self.line(&format!("- (id){} {{", signature(&ctor.selector, &ctor.params)));
        self.nested(&ctor.body.statements);
        self.line("}");
    }

    fn method(&mut self, method: &MethodDecl) {
        let sign = if method.is_static { '+' } else { '-' };
        self.line(&format!(
            "{} ({}){} {{",
            sign,
            method.return_ty,
            signature(&method.name, &method.params)
        ));
        self.nested(&method.body.statements);
        self.line("}");
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Expression(s) => self.line(&format!("{};", format_expr(&s.expression))),
            Statement::Block(block) => {
                self.line("{");
                self.nested(&block.statements);
                self.line("}");
            }
            Statement::VariableDecl(decl) => match &decl.initializer {
                Some(init) => {
                    self.line(&format!("{} {} = {};", decl.ty, decl.name, format_expr(init)))
                }
                None => self.line(&format!("{} {};", decl.ty, decl.name)),
            },
            Statement::If(s) => {
                self.line(&format!("if ({}) {{", format_expr(&s.condition)));
                self.branch(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    self.line("}");
                    self.line("else {");
                    self.branch(else_branch);
                }
                self.line("}");
            }
            Statement::Return(s) => match &s.value {
                Some(value) => self.line(&format!("return {};", format_expr(value))),
                None => self.line("return;"),
            },
            Statement::ConstructorInvocation(invocation) => {
                self.line(&format!("{};", format_invocation(invocation)))
            }
            Statement::AllocationGuard(guard) => {
                self.line(&format!("if ((self = {})) {{", format_invocation(&guard.invocation)));
                self.nested(&guard.body.statements);
                self.line("}");
            }
            Statement::ClassGuard(guard) => {
                self.line(&format!("if (self == [{} class]) {{", guard.class.name));
                self.nested(&guard.body.statements);
                self.line("}");
            }
        }
    }

    fn branch(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => self.nested(&block.statements),
            other => self.nested(std::slice::from_ref(other)),
        }
    }
}

fn instance_field_name(name: &str) -> String {
    format!("{}_", name)
}

fn static_field_name(owner: &str, name: &str) -> String {
    format!("{}_{}_", owner, name)
}

fn field_name(field: &FieldRef) -> String {
    if field.is_static {
        static_field_name(&field.owner.name, &field.name)
    } else {
        instance_field_name(&field.name)
    }
}

/// `initWithInt:withByte:` + params => `initWithInt:(int)i withByte:(char)b`
fn signature(selector: &str, params: &[Param]) -> String {
    if params.is_empty() {
        return selector.to_string();
    }
    let keywords: Vec<&str> = selector.split_terminator(':').collect();
    let parts: Vec<String> = params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let keyword = keywords.get(i).copied().unwrap_or("");
            format!("{}:({}){}", keyword, p.ty, p.name)
        })
        .collect();
    parts.join(" ")
}

/// `addWithId:` + args => `addWithId:x`
fn message(selector: &str, args: &[Expression]) -> String {
    if args.is_empty() {
        return selector.to_string();
    }
    let keywords: Vec<&str> = selector.split_terminator(':').collect();
    let parts: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let keyword = keywords.get(i).copied().unwrap_or("");
            format!("{}:{}", keyword, format_expr(arg))
        })
        .collect();
    parts.join(" ")
}

fn format_invocation(invocation: &ConstructorInvocation) -> String {
    let receiver = match invocation.kind {
        InvocationKind::Super => "super",
        InvocationKind::This => "self",
    };
    format!("[{} {}]", receiver, message(&invocation.selector, &invocation.args))
}

fn format_string(units: &[u16]) -> String {
    let mut text = String::with_capacity(units.len() + 3);
    text.push_str("@\"");
    for ch in char::decode_utf16(units.iter().copied()) {
        match ch {
            Ok('"') => text.push_str("\\\""),
            Ok('\\') => text.push_str("\\\\"),
            Ok('\n') => text.push_str("\\n"),
            Ok('\t') => text.push_str("\\t"),
            Ok('\r') => text.push_str("\\r"),
            Ok(c) => text.push(c),
            Err(e) => write!(text, "\\u{:04x}", e.unpaired_surrogate()).unwrap(),
        }
    }
    text.push('"');
    text
}

fn format_units(units: &[u16]) -> String {
    let elements: Vec<String> = units.iter().map(|u| format!("(int) 0x{:04x}", u)).collect();
    format!(
        "[NSString stringWithCharacters:(unichar[]) {{ {} }} length:{}]",
        elements.join(", "),
        units.len()
    )
}

fn format_expr(expr: &Expression) -> String {
    match expr {
        Expression::IntLiteral(lit) => lit.value.to_string(),
        Expression::FloatLiteral(lit) => lit.value.to_string(),
        Expression::BooleanLiteral(lit) => (if lit.value { "YES" } else { "NO" }).to_string(),
        Expression::CharLiteral(lit) => match char::from_u32(lit.value as u32) {
            Some(c) if c.is_ascii_graphic() || c == ' ' => format!("'{}'", c),
            _ => format!("0x{:04x}", lit.value),
        },
        Expression::NullLiteral(_) => "nil".to_string(),
        Expression::StringLiteral(lit) => format_string(&lit.units),
        Expression::Name(name) => match &name.binding {
            Some(Binding::Field(field)) => field_name(field),
            _ => name.name.clone(),
        },
        Expression::SelfRef(_) => "self".to_string(),
        Expression::FieldAccess(access) => {
            match (access.receiver.as_ref(), access.field.is_static) {
                (_, true) | (Expression::SelfRef(_), false) => field_name(&access.field),
                (receiver, false) => {
                    format!("{}->{}", format_expr(receiver), field_name(&access.field))
                }
            }
        }
        Expression::Assign(assign) => {
            format!("{} = {}", format_expr(&assign.target), format_expr(&assign.value))
        }
        Expression::Binary(binary) => format!(
            "{} {} {}",
            format_expr(&binary.left),
            binary.op,
            format_expr(&binary.right)
        ),
        Expression::Call(call) => {
            let receiver = match (&call.receiver, &call.method) {
                (Some(receiver), _) => format_expr(receiver),
                (None, Some(method)) if method.is_static => method.owner.name.clone(),
                (None, _) => "self".to_string(),
            };
            format!("[{} {}]", receiver, message(&call.selector, &call.args))
        }
        Expression::New(new) => {
            let mut args = Vec::with_capacity(new.args.len() + 1);
            if let Some(outer) = &new.outer {
                args.push(outer.as_ref().clone());
            }
            args.extend(new.args.iter().cloned());
            format!("[[{} alloc] {}]", new.class.name, message(&new.selector, &args))
        }
        Expression::ArrayInit(array) => {
            let elements: Vec<String> = array.elements.iter().map(format_expr).collect();
            format!(
                "[IOSObjectArray arrayWithObjects:(id[]){{ {} }} count:{} \
                 type:[IOSClass classWithClass:[{} class]]]",
                elements.join(", "),
                array.elements.len(),
                array.element_type
            )
        }
        Expression::Initialize(invocation) => format_invocation(invocation),
        Expression::HookCall(hook) => format!("{}({})", hook.hook, format_expr(&hook.argument)),
        Expression::StringFromUnits(s) => format_units(&s.units),
        Expression::StringFormat(s) => {
            let format: Vec<u16> = s.format.encode_utf16().collect();
            let mut text = format!("[NSString stringWithFormat:{}", format_string(&format));
            for arg in &s.args {
                write!(text, ", {}", format_expr(arg)).unwrap();
            }
            text.push(']');
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeRef;

    #[test]
    fn test_constructor_signature_with_params() {
        let ctor = ConstructorDecl::new("initWithInt:withByte:")
            .with_param(Param::new("i", "int"))
            .with_param(Param::new("b", "char"));
        assert_eq!(
            ctor.pretty_print().lines().next().unwrap(),
            "- (id)initWithInt:(int)i withByte:(char)b {"
        );
    }

    #[test]
    fn test_string_construction_rendering() {
        let units = Expression::StringFromUnits(StringFromUnits {
            units: vec![0xffff],
            span: Default::default(),
        });
        assert_eq!(
            units.pretty_print(),
            "[NSString stringWithCharacters:(unichar[]) { (int) 0xffff } length:1]"
        );

        let format = Expression::StringFormat(StringFormat {
            format: "hello%@".to_string(),
            args: vec![units],
            span: Default::default(),
        });
        assert_eq!(
            format.pretty_print(),
            "[NSString stringWithFormat:@\"hello%@\", \
             [NSString stringWithCharacters:(unichar[]) { (int) 0xffff } length:1]]"
        );
    }

    #[test]
    fn test_field_rendering() {
        let owner = TypeRef::new(1, "Test");
        assert_eq!(Expression::field(FieldRef::instance(&owner, "date")).pretty_print(), "date_");
        assert_eq!(
            Expression::field(FieldRef::of_class(&owner, "iSet")).pretty_print(),
            "Test_iSet_"
        );

        let outer = TypeRef::new(0, "Outer");
        let access = Expression::field_access(
            Expression::field(FieldRef::instance(&owner, "this$0")),
            FieldRef::instance(&outer, "outerVar"),
        );
        assert_eq!(access.pretty_print(), "this$0_->outerVar_");
    }

    #[test]
    fn test_allocation_guard_rendering() {
        let guard = Statement::AllocationGuard(AllocationGuard {
            invocation: ConstructorInvocation::this_call(
                "initTestWithBoolean:",
                vec![Expression::bool(true)],
            ),
            body: Block::new(vec![Statement::ret(None)]),
            span: Default::default(),
        });
        let text = guard.pretty_print();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "if ((self = [self initTestWithBoolean:YES])) {");
        assert_eq!(lines[1], "  return;");
        assert_eq!(lines[2], "}");
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(Expression::string("a\"b\n").pretty_print(), "@\"a\\\"b\\n\"");
        assert_eq!(Expression::string_units(vec![0xd800]).pretty_print(), "@\"\\ud800\"");
    }
}
