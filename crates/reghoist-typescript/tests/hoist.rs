//! End-to-end tests through parse → hoist → print, covering the behaviors
//! the transform promises to host pipelines.

use pretty_assertions::assert_eq;
use reghoist_typescript::{
    transform_source, PathResolver, TransformError, TransformOptions,
};

fn transform(source: &str) -> String {
    transform_source(source, "test.ts", &TransformOptions::default(), None)
        .expect("transform succeeds")
}

fn transform_err(source: &str) -> TransformError {
    transform_source(source, "test.ts", &TransformOptions::default(), None)
        .expect_err("transform fails")
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{haystack}"))
}

struct PackageResolver;

impl PathResolver for PackageResolver {
    fn resolve(&self, specifier: &str, _containing_file: &str) -> Option<Vec<String>> {
        if specifier == "@rbxts/pkg" {
            Some(
                ["ReplicatedStorage", "rbxts_include", "node_modules", "@rbxts", "pkg"]
                    .iter()
                    .map(|segment| segment.to_string())
                    .collect(),
            )
        } else {
            None
        }
    }
}

#[test]
fn hoists_registration_above_imports() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         doubles.register(\"./foo\");\n\
         print(foo);\n",
    );
    assert!(position(&output, "doubles.register") < position(&output, "import { foo }"));
    assert!(position(&output, "import { foo }") < position(&output, "print(foo)"));
}

#[test]
fn keeps_handle_import_as_first_statement() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         doubles.register(\"./foo\");\n",
    );
    let first_line = output.lines().next().expect("output");
    assert!(first_line.contains("@rbxts/doubles"), "{output}");
}

#[test]
fn rewrites_relative_paths_into_instance_accesses() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./a/b/c\";\n\
         doubles.register(\"./a/b/c\");\n",
    );
    assert!(output.contains("doubles.register(script.Parent.a.b.c)"), "{output}");
}

#[test]
fn rewrites_parent_relative_and_hyphenated_paths() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         doubles.register(\"../x\");\n\
         doubles.register(\"./my-module/index\");\n",
    );
    assert!(output.contains("doubles.register(script.Parent.Parent.x)"), "{output}");
    assert!(
        output.contains("doubles.register(script.Parent[\"my-module\"])"),
        "{output}"
    );
}

#[test]
fn leaves_cast_path_arguments_untouched() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         doubles.register(\"./foo\" as unknown as ModuleScript);\n",
    );
    assert!(
        output.contains("doubles.register(\"./foo\" as unknown as ModuleScript)"),
        "{output}"
    );
}

#[test]
fn resolves_package_specifiers_through_the_resolver() {
    let output = transform_source(
        "import { doubles } from \"@rbxts/doubles\";\n\
         doubles.register(\"@rbxts/pkg\", () => ({}));\n",
        "test.ts",
        &TransformOptions::default(),
        Some(&PackageResolver),
    )
    .expect("transform succeeds");
    assert!(
        output.contains(
            "doubles.register(game.GetService(\"ReplicatedStorage\")!.FindFirstChild(\"rbxts_include\")!"
        ),
        "{output}"
    );
    assert!(output.contains(" as ModuleScript, () => ({})"), "{output}");
}

#[test]
fn missing_resolver_leaves_package_specifiers_alone() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         doubles.register(\"@rbxts/pkg\", () => ({}));\n",
    );
    assert!(output.contains("doubles.register(\"@rbxts/pkg\""), "{output}");
}

#[test]
fn resolver_miss_leaves_the_literal_untouched() {
    let output = transform_source(
        "import { doubles } from \"@rbxts/doubles\";\n\
         doubles.register(\"@rbxts/unknown\", () => ({}));\n",
        "test.ts",
        &TransformOptions::default(),
        Some(&PackageResolver),
    )
    .expect("transform succeeds");
    assert!(output.contains("doubles.register(\"@rbxts/unknown\""), "{output}");
}

#[test]
fn rewrites_load_actual_inside_factories() {
    let output = transform_source(
        "import { doubles } from \"@rbxts/doubles\";\n\
         doubles.register(\"@rbxts/pkg\", () => {\n\
             const actual = doubles.loadActual(\"@rbxts/pkg\");\n\
             return actual;\n\
         });\n",
        "test.ts",
        &TransformOptions::default(),
        Some(&PackageResolver),
    )
    .expect("transform succeeds");
    assert!(
        output.contains("doubles.register(game.GetService(\"ReplicatedStorage\")"),
        "{output}"
    );
    assert!(
        output.contains("doubles.loadActual(game.GetService(\"ReplicatedStorage\")"),
        "{output}"
    );
}

#[test]
fn rewrites_relative_load_actual_too() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         doubles.register(\"./foo\", () => {\n\
             const actual = doubles.loadActual(\"./foo\");\n\
             return actual;\n\
         });\n",
    );
    assert!(output.contains("doubles.loadActual(script.Parent.foo)"), "{output}");
}

#[test]
fn hoists_mock_prefixed_variables_with_their_call() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         const mockFoo = doubles.fn();\n\
         doubles.register(\"./foo\", () => ({ foo: mockFoo }));\n",
    );
    let mock = position(&output, "const mockFoo");
    let register = position(&output, "doubles.register");
    let import_foo = position(&output, "import { foo }");
    assert!(mock < register && register < import_foo, "{output}");
}

#[test]
fn leaves_unrelated_handle_methods_in_place() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         doubles.reset(\"./foo\");\n",
    );
    assert!(position(&output, "import { foo }") < position(&output, "doubles.reset"), "{output}");
}

#[test]
fn ignores_shadowed_handles() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         const doubles = { register: () => {} };\n\
         doubles.register(\"./foo\");\n",
    );
    assert!(
        position(&output, "import { foo }") < position(&output, "doubles.register"),
        "{output}"
    );
    assert!(output.contains("doubles.register(\"./foo\")"), "{output}");
}

#[test]
fn ignores_non_handle_objects() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         other.register(\"./foo\");\n",
    );
    assert!(position(&output, "import { foo }") < position(&output, "other.register"), "{output}");
}

fn identity_print(source: &str) -> String {
    let (parsed, errors) = reghoist_typescript::parse_module(source, "test.ts");
    assert!(errors.is_empty());
    reghoist_typescript::printer::print_module(&parsed.module).expect("prints")
}

#[test]
fn passes_through_modules_without_registrations() {
    let source = "import { foo } from \"./foo\";\nconsole.log(foo);\n";
    assert_eq!(transform(source), identity_print(source));
}

#[test]
fn is_idempotent_on_already_hoisted_input() {
    let source = "import { doubles } from \"@rbxts/doubles\";\n\
                  import { Svc } from \"pkg\";\n\
                  import { foo } from \"./foo\";\n\
                  const mockFoo = doubles.fn();\n\
                  doubles.register(\"./foo\", () => ({ foo: mockFoo }));\n\
                  doubles.register(Svc.path, () => ({}));\n\
                  print(foo);\n";
    let once = transform(source);
    let twice = transform(&once);
    assert_eq!(twice, once);
}

#[test]
fn hoists_chained_calls_as_one_statement() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { a } from \"./a\";\n\
         import { b } from \"./b\";\n\
         doubles.register(\"./a\").unregister(\"./b\");\n",
    );
    let chain = position(
        &output,
        "doubles.register(script.Parent.a).unregister(script.Parent.b)",
    );
    assert!(chain < position(&output, "import { a }"), "{output}");
    assert!(chain < position(&output, "import { b }"), "{output}");
}

#[test]
fn hoists_aliased_and_namespace_imports() {
    let output = transform(
        "import { doubles as j } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         j.register(\"./foo\");\n",
    );
    assert!(position(&output, "j.register") < position(&output, "import { foo }"), "{output}");

    let output = transform(
        "import * as DG from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         DG.doubles.register(\"./foo\");\n",
    );
    assert!(
        position(&output, "DG.doubles.register") < position(&output, "import { foo }"),
        "{output}"
    );
}

#[test]
fn namespace_without_handle_member_is_not_tracked() {
    let output = transform(
        "import * as DG from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         DG.register(\"./foo\");\n",
    );
    assert!(position(&output, "import { foo }") < position(&output, "DG.register"), "{output}");
}

#[test]
fn side_effect_handle_import_tracks_nothing() {
    let source = "import \"@rbxts/doubles\";\n\
                  import { foo } from \"./foo\";\n\
                  doubles.register(\"./foo\");\n";
    assert_eq!(transform(source), identity_print(source));
}

#[test]
fn pulls_up_dependency_imports_only() {
    let output = transform(
        "import { doubles as h } from \"@rbxts/doubles\";\n\
         import Unrelated from \"@rbxts/unrelated\";\n\
         import { Svc } from \"pkg\";\n\
         import { f } from \"./f\";\n\
         h.register(Svc.path, () => ({}));\n",
    );
    let handle = position(&output, "@rbxts/doubles");
    let svc = position(&output, "import { Svc }");
    let call = position(&output, "h.register");
    let unrelated = position(&output, "import Unrelated");
    let f = position(&output, "import { f }");
    assert!(handle < svc && svc < call && call < unrelated && unrelated < f, "{output}");
}

#[test]
fn hoists_inside_function_blocks_without_escaping() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         console.log(\"top level\");\n\
         function setup() {\n\
             console.log(\"before\");\n\
             doubles.register(\"./foo\");\n\
         }\n",
    );
    let top = position(&output, "console.log(\"top level\")");
    let register = position(&output, "doubles.register");
    let before = position(&output, "console.log(\"before\")");
    assert!(top < register && register < before, "{output}");
}

#[test]
fn hoists_inside_try_and_catch_blocks() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         try {\n\
             console.log(\"a\");\n\
             doubles.register(\"./a\");\n\
         } catch (e) {\n\
             console.log(\"b\");\n\
             doubles.register(\"./b\");\n\
         }\n",
    );
    assert!(
        position(&output, "doubles.register(script.Parent.a)")
            < position(&output, "console.log(\"a\")"),
        "{output}"
    );
    assert!(
        position(&output, "doubles.register(script.Parent.b)")
            < position(&output, "console.log(\"b\")"),
        "{output}"
    );
}

#[test]
fn hoists_inside_callback_bodies() {
    let output = transform(
        "import { doubles, beforeEach } from \"@rbxts/doubles\";\n\
         beforeEach(() => {\n\
             console.log(\"setup\");\n\
             doubles.register(\"./foo\");\n\
         });\n",
    );
    assert!(
        position(&output, "doubles.register") < position(&output, "console.log(\"setup\")"),
        "{output}"
    );
}

#[test]
fn factory_scope_violation_aborts_with_details() {
    let err = transform_err(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         doubles.register(\"./foo\", () => someVar);\n",
    );
    match err {
        TransformError::FactoryScope {
            name,
            module_argument,
            ..
        } => {
            assert_eq!(name, "someVar");
            assert_eq!(module_argument.as_deref(), Some("./foo"));
        }
        other => panic!("expected a factory scope error, found {other:?}"),
    }
}

#[test]
fn mock_prefixed_references_are_permitted() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         doubles.register(\"./foo\", () => mockThing);\n",
    );
    assert!(output.contains("() => mockThing"), "{output}");
}

#[test]
fn pure_constants_hoist_when_referenced() {
    let output = transform(
        "import { doubles } from \"@rbxts/doubles\";\n\
         import { foo } from \"./foo\";\n\
         const LIMIT = 5;\n\
         doubles.register(\"./foo\", () => ({ limit: LIMIT }));\n",
    );
    assert!(position(&output, "const LIMIT") < position(&output, "doubles.register"), "{output}");
}

#[test]
fn impure_constant_reference_fails() {
    let err = transform_err(
        "import { doubles } from \"@rbxts/doubles\";\n\
         const value = compute();\n\
         doubles.register(\"./foo\", () => value);\n",
    );
    match err {
        TransformError::FactoryScope { name, .. } => assert_eq!(name, "value"),
        other => panic!("expected a factory scope error, found {other:?}"),
    }
}

#[test]
fn syntax_errors_are_rejected() {
    let err = transform_err("const x = ;\n");
    match err {
        TransformError::Parse { file_name, .. } => assert_eq!(file_name, "test.ts"),
        other => panic!("expected a parse error, found {other:?}"),
    }
}

#[test]
fn options_deserialize_from_host_json() -> eyre::Result<()> {
    let options: TransformOptions = serde_json::from_str(
        r#"{ "handleModule": "@acme/testing", "handleName": "testing" }"#,
    )?;
    assert_eq!(options.handle_module, "@acme/testing");
    let output = transform_source(
        "import { testing } from \"@acme/testing\";\n\
         import { foo } from \"./foo\";\n\
         testing.register(\"./foo\");\n",
        "test.ts",
        &options,
        None,
    )?;
    assert!(
        position(&output, "testing.register") < position(&output, "import { foo }"),
        "{output}"
    );
    Ok(())
}
