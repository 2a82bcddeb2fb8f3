//! XML documents in the server's dialect, for wiremock response bodies.

/// A sample document with a name, received date and a project reference.
pub fn sample_body(base: &str, id: &str, name: &str, project_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<smp:sample xmlns:smp="http://genologics.com/ri/sample" xmlns:udf="http://genologics.com/ri/userdefined" uri="{base}/api/v1/samples/{id}" limsid="{id}">
  <name>{name}</name>
  <date-received>2012-05-01</date-received>
  <project uri="{base}/api/v1/projects/{project_id}" limsid="{project_id}"/>
  <udf:field type="Numeric" name="Reads">12</udf:field>
</smp:sample>"#
    )
}

/// A project document with a researcher reference.
pub fn project_body(base: &str, id: &str, name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<prj:project xmlns:prj="http://genologics.com/ri/project" uri="{base}/api/v1/projects/{id}" limsid="{id}">
  <name>{name}</name>
  <open-date>2012-04-01</open-date>
  <researcher uri="{base}/api/v1/researchers/R1"/>
</prj:project>"#
    )
}

/// An artifact document; `uri_suffix` carries an optional `?state=` part.
pub fn artifact_body(base: &str, id: &str, uri_suffix: &str, qc_flag: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<art:artifact xmlns:art="http://genologics.com/ri/artifact" uri="{base}/api/v1/artifacts/{id}{uri_suffix}" limsid="{id}">
  <name>lane 1</name>
  <type>Analyte</type>
  <qc-flag>{qc_flag}</qc-flag>
  <working-flag>true</working-flag>
  <location>
    <container uri="{base}/api/v1/containers/C1" limsid="C1"/>
    <value>A:1</value>
  </location>
  <sample uri="{base}/api/v1/samples/S1" limsid="S1"/>
</art:artifact>"#
    )
}

/// One page of a samples collection; `next_index` adds a `next-page` link.
pub fn samples_page(base: &str, ids: &[&str], next_index: Option<u32>) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<smp:samples xmlns:smp="http://genologics.com/ri/sample">"#,
    );
    for id in ids {
        body.push_str(&format!(
            "\n  <sample uri=\"{base}/api/v1/samples/{id}\" limsid=\"{id}\"/>"
        ));
    }
    if let Some(index) = next_index {
        body.push_str(&format!(
            "\n  <next-page uri=\"{base}/api/v1/samples?start-index={index}\"/>"
        ));
    }
    body.push_str("\n</smp:samples>");
    body
}

/// The error envelope the server wraps failures in.
pub fn exception_body(message: &str, suggested_actions: Option<&str>) -> String {
    let actions = suggested_actions
        .map(|text| format!("\n  <suggested-actions>{text}</suggested-actions>"))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<exc:exception xmlns:exc="http://genologics.com/ri/exception">
  <message>{message}</message>{actions}
</exc:exception>"#
    )
}

/// The version index at the unversioned `api` resource.
pub fn versions_body(base: &str, majors: &[&str]) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ver:versions xmlns:ver="http://genologics.com/ri/version">"#,
    );
    for major in majors {
        body.push_str(&format!(
            "\n  <version major=\"{major}\" uri=\"{base}/api/{major}\"/>"
        ));
    }
    body.push_str("\n</ver:versions>");
    body
}
