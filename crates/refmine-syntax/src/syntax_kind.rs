use serde::{Deserialize, Serialize};

/// Node kinds of a Java syntax tree as emitted by GumTree's JDT generator.
///
/// Variants serialize with the JDT class name (`SimpleName`, `MethodDeclaration`, ...)
/// so interchange documents can be read as-is. The few synthetic kinds GumTree
/// introduces keep their upper-case spelling. Anything we do not know about
/// becomes [`SyntaxKind::Other`]; classification never looks at those nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    // --- Compilation unit structure ---
    CompilationUnit,
    PackageDeclaration,
    ImportDeclaration,

    // --- Type declarations ---
    TypeDeclaration,
    EnumDeclaration,
    RecordDeclaration,
    AnnotationTypeDeclaration,
    AnnotationTypeMemberDeclaration,
    AnonymousClassDeclaration,
    EnumConstantDeclaration,
    TypeDeclarationStatement,
    TypeParameter,
    #[serde(rename = "TYPE_DECLARATION_KIND")]
    TypeDeclarationKind,

    // --- Members and variables ---
    FieldDeclaration,
    MethodDeclaration,
    Initializer,
    SingleVariableDeclaration,
    VariableDeclarationFragment,
    VariableDeclarationStatement,
    VariableDeclarationExpression,

    // --- Statements ---
    Block,
    AssertStatement,
    BreakStatement,
    ContinueStatement,
    DoStatement,
    EmptyStatement,
    EnhancedForStatement,
    ExpressionStatement,
    ForStatement,
    IfStatement,
    LabeledStatement,
    ReturnStatement,
    SwitchCase,
    SwitchStatement,
    SynchronizedStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    WhileStatement,
    YieldStatement,

    // --- Expressions ---
    ArrayAccess,
    ArrayCreation,
    ArrayInitializer,
    Assignment,
    CastExpression,
    ClassInstanceCreation,
    ConditionalExpression,
    ConstructorInvocation,
    ExpressionMethodReference,
    FieldAccess,
    InfixExpression,
    InstanceofExpression,
    LambdaExpression,
    MethodInvocation,
    ParenthesizedExpression,
    PostfixExpression,
    PrefixExpression,
    SuperConstructorInvocation,
    SuperFieldAccess,
    SuperMethodInvocation,
    SwitchExpression,
    ThisExpression,
    TypeLiteral,
    #[serde(rename = "ASSIGNMENT_OPERATOR")]
    AssignmentOperator,
    #[serde(rename = "INFIX_EXPRESSION_OPERATOR")]
    InfixExpressionOperator,
    #[serde(rename = "PREFIX_EXPRESSION_OPERATOR")]
    PrefixExpressionOperator,
    #[serde(rename = "POSTFIX_EXPRESSION_OPERATOR")]
    PostfixExpressionOperator,
    #[serde(rename = "METHOD_INVOCATION_RECEIVER")]
    MethodInvocationReceiver,
    #[serde(rename = "METHOD_INVOCATION_ARGUMENTS")]
    MethodInvocationArguments,

    // --- Names ---
    SimpleName,
    QualifiedName,

    // --- Types ---
    SimpleType,
    PrimitiveType,
    QualifiedType,
    WildcardType,
    ArrayType,
    ParameterizedType,
    NameQualifiedType,
    UnionType,
    IntersectionType,
    #[serde(rename = "VARARGS_TYPE")]
    VarargsType,

    // --- Modifiers and annotations ---
    Modifier,
    MarkerAnnotation,
    NormalAnnotation,
    SingleMemberAnnotation,
    MemberValuePair,

    // --- Literals ---
    BooleanLiteral,
    CharacterLiteral,
    NullLiteral,
    NumberLiteral,
    StringLiteral,
    TextBlock,

    // --- Comments and documentation ---
    Javadoc,
    TagElement,
    TextElement,
    MemberRef,
    MethodRef,
    MethodRefParameter,
    LineComment,
    BlockComment,

    #[serde(other)]
    Other,
}

impl SyntaxKind {
    /// Whether this kind denotes a type reference, as opposed to an expression,
    /// statement or identifier.
    ///
    /// `UnionType` and `IntersectionType` are deliberately excluded: they only
    /// appear in catch clauses and casts, never as a declaration's type.
    #[inline]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::SimpleType
                | SyntaxKind::PrimitiveType
                | SyntaxKind::QualifiedType
                | SyntaxKind::WildcardType
                | SyntaxKind::ArrayType
                | SyntaxKind::ParameterizedType
                | SyntaxKind::VarargsType
                | SyntaxKind::NameQualifiedType
        )
    }

    #[inline]
    pub const fn is_variable_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::VariableDeclarationStatement | SyntaxKind::VariableDeclarationExpression
        )
    }

    /// Literal and documentation kinds whose label edits are incidental text
    /// changes rather than renames.
    #[inline]
    pub const fn is_incidental_text(self) -> bool {
        matches!(
            self,
            SyntaxKind::StringLiteral | SyntaxKind::NumberLiteral | SyntaxKind::TextElement
        )
    }
}
