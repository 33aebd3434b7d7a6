use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

/// 路由匹配得到的路径参数，值已做百分号解码
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathParams(pub Vec<(String, String)>);

impl<'a> From<&matchit::Params<'a, 'a>> for PathParams {
    fn from(p: &matchit::Params<'a, 'a>) -> Self {
        Self(
            p.iter()
                .map(|(k, v)| (k.to_string(), decode(v)))
                .collect(),
        )
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn by_index(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(_, v)| v.as_str())
    }

    /// 以字符串对象的形式交给校验步骤
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}
