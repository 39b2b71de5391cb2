//! GLSL ES 1.00 programs for GPU backends
//!
//! The lighting library is written once and spliced into both program
//! bodies when the sources are built, so the vertex and fragment stages can
//! never drift apart. [`crate::lighting`] is the CPU rendition of the same
//! formulas.

/// Attribute names bound by a backend
pub mod attributes {
    pub const POSITION: &str = "aVertexPosition";
    pub const COLOR: &str = "aVertexColor";
    pub const NORMAL: &str = "aNormal";
}

/// Uniform names bound by a backend
pub mod uniforms {
    pub const PROJECTION_MATRIX: &str = "uProjectionMatrix";
    pub const MODEL_VIEW_MATRIX: &str = "uModelViewMatrix";
    pub const LIGHT_POWER: &str = "uLightPower";
    pub const LIGHT_DIRECTION: &str = "uLightDirection";
    pub const DAMPING_FUNCTION: &str = "uDampingFunction";
    pub const VIEW_POSITION: &str = "uViewPosition";
    pub const LIGHT_MODEL: &str = "uLightModel";
    pub const SHADING: &str = "uShading";
    pub const LIGHT_SHININESS: &str = "uLightShininess";
}

pub const LIGHTING_LIBRARY: &str = r#"
float positive_dot(vec3 left, vec3 right) {
    return max(dot(left, right), 0.0);
}

float lambert(vec3 normal, vec3 lightDir, float power) {
    return max(dot(normal, normalize(lightDir)), 0.0) * power;
}

float phong(vec3 normal, vec3 lightDir, vec3 viewPosition, float power, float shininess) {
    float diffuse = positive_dot(normal, lightDir);
    vec3 reflection = normalize(reflect(-lightDir, normal));
    float specular = pow(positive_dot(reflection, -normalize(viewPosition)), shininess);
    return (diffuse + specular) * power;
}

float celShaded(vec3 normal, vec3 lightDir, float power) {
    float coef = lambert(normal, lightDir, power);
    if (coef >= 0.95) {
        return 1.0;
    } else if (coef >= 0.5) {
        return 0.7;
    } else if (coef >= 0.2) {
        return 0.4;
    }
    return 0.1;
}

float evaluateLighting(int shading, int current, int lightModel, vec3 normal, vec4 vertex,
                       vec3 lightDir, vec3 viewPosition, float power, float shininess) {
    float light = 1.0;
    if (shading == current) {
        if (lightModel == 0) {
            light = lambert(normal, lightDir, power);
        } else if (lightModel == 1) {
            light = phong(normal, lightDir, viewPosition, power, shininess);
        } else if (lightModel == 2) {
            light = celShaded(normal, lightDir, power);
        }
    }
    return light;
}

float dampLight(int dampingFunction, float light) {
    if (dampingFunction == 1) {
        return light * light;
    }
    return light;
}
"#;

const UNIFORM_BLOCK: &str = r#"
uniform mat4 uModelViewMatrix;
uniform float uLightPower;
uniform vec3 uLightDirection;
uniform lowp int uDampingFunction;
uniform lowp int uShading;
uniform lowp int uLightModel;
uniform float uLightShininess;

varying vec4 vPosition;
varying vec4 vColor;
varying vec3 vNormal;
"#;

const VERTEX_HEADER: &str = r#"precision mediump float;
attribute vec4 aVertexPosition;
attribute vec4 aVertexColor;
attribute vec3 aNormal;

uniform mat4 uProjectionMatrix;
"#;

const VERTEX_MAIN: &str = r#"
void main(void) {
    vec3 normal = normalize(mat3(uModelViewMatrix) * aNormal);
    vec3 position = vec3(uModelViewMatrix * aVertexPosition);
    vec3 lightDirection = normalize(uLightDirection - position);

    int current = 1;
    float light = evaluateLighting(
        uShading, current, uLightModel, normal, aVertexPosition,
        lightDirection, position, uLightPower, uLightShininess);
    light = dampLight(uDampingFunction, light);

    gl_Position = uProjectionMatrix * uModelViewMatrix * aVertexPosition;
    vColor = aVertexColor;
    vColor.rgb *= light;
    vPosition = aVertexPosition;
    vNormal = normal;
}
"#;

const FRAGMENT_HEADER: &str = "precision mediump float;\n";

const FRAGMENT_MAIN: &str = r#"
void main(void) {
    vec3 positionEye = vec3(uModelViewMatrix * vPosition);
    vec3 lightDirection = normalize(uLightDirection - positionEye);

    int current = 0;
    float light = evaluateLighting(
        uShading, current, uLightModel, vNormal, vPosition,
        lightDirection, positionEye, uLightPower, uLightShininess);
    light = dampLight(uDampingFunction, light);

    gl_FragColor = vColor;
    gl_FragColor.rgb *= light;
}
"#;

/// Source of the vertex-stage program
pub fn vertex_shader_source() -> String {
    [VERTEX_HEADER, UNIFORM_BLOCK, LIGHTING_LIBRARY, VERTEX_MAIN].concat()
}

/// Source of the fragment-stage program
pub fn fragment_shader_source() -> String {
    [FRAGMENT_HEADER, UNIFORM_BLOCK, LIGHTING_LIBRARY, FRAGMENT_MAIN].concat()
}
